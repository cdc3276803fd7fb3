use makepad_widgets::*;

use super::TtsApp;

live_design! {
    use link::theme::*;
    use link::shaders::*;
    use link::widgets::*;
    use piper_widgets::theme::*;
    use piper_widgets::components::*;

    // Dashed drop target; `drag` lights it up while a file hovers over it
    UploadArea = <View> {
        width: Fill, height: 96
        margin: {bottom: 12}
        flow: Down
        align: {x: 0.5, y: 0.5}
        spacing: 4
        cursor: Hand
        show_bg: true
        draw_bg: {
            instance drag: 0.0
            fn pixel(self) -> vec4 {
                let sdf = Sdf2d::viewport(self.pos * self.rect_size);
                sdf.box(1.0, 1.0, self.rect_size.x - 2.0, self.rect_size.y - 2.0, 10.0);
                sdf.fill(mix((SLATE_50), (INDIGO_50), self.drag));
                sdf.box(1.0, 1.0, self.rect_size.x - 2.0, self.rect_size.y - 2.0, 10.0);
                sdf.stroke(mix((SLATE_300), (INDIGO_500), self.drag), 1.5);
                return sdf.result;
            }
        }

        <Label> {
            text: "Arrastra un archivo aquí o haz clic para seleccionarlo"
            draw_text: {
                color: (TEXT_SECONDARY)
                text_style: <FONT_MEDIUM>{ font_size: 11.0 }
            }
        }
        <HintText> { text: "El texto extraído reemplaza el contenido actual" }
    }

    // Character counter (severity: 0 = normal, 1 = warning, 2 = danger)
    CharCounter = <Label> {
        text: "0"
        draw_text: {
            instance severity: 0.0
            text_style: <FONT_MEDIUM>{ font_size: 10.0 }
            fn get_color(self) -> vec4 {
                let normal = #64748b;
                let warning = #f59e0b;
                let danger = #ef4444;
                return mix(mix(normal, warning, clamp(self.severity, 0.0, 1.0)), danger, clamp(self.severity - 1.0, 0.0, 1.0));
            }
        }
    }

    FormDropDown = <DropDown> {
        width: Fill, height: Fit
        padding: {left: 10, right: 10, top: 8, bottom: 8}
        popup_menu_position: BelowInput
        draw_bg: {
            fn pixel(self) -> vec4 {
                let sdf = Sdf2d::viewport(self.pos * self.rect_size);
                sdf.box(0.5, 0.5, self.rect_size.x - 1.0, self.rect_size.y - 1.0, 6.0);
                sdf.fill((WHITE));
                sdf.box(0.5, 0.5, self.rect_size.x - 1.0, self.rect_size.y - 1.0, 6.0);
                sdf.stroke((SLATE_300), 1.0);
                return sdf.result;
            }
        }
        draw_text: {
            text_style: <FONT_REGULAR>{ font_size: 11.0 }
            fn get_color(self) -> vec4 {
                return (TEXT_PRIMARY);
            }
        }
    }

    // Stand-in for the voice selector while no gender is chosen
    DisabledSelect = <View> {
        width: Fill, height: 34
        padding: {left: 10, right: 10}
        align: {y: 0.5}
        show_bg: true
        draw_bg: {
            fn pixel(self) -> vec4 {
                let sdf = Sdf2d::viewport(self.pos * self.rect_size);
                sdf.box(0.5, 0.5, self.rect_size.x - 1.0, self.rect_size.y - 1.0, 6.0);
                sdf.fill((SLATE_100));
                sdf.box(0.5, 0.5, self.rect_size.x - 1.0, self.rect_size.y - 1.0, 6.0);
                sdf.stroke((SLATE_200), 1.0);
                return sdf.result;
            }
        }
        placeholder_label = <Label> {
            draw_text: {
                color: (TEXT_MUTED)
                text_style: <FONT_REGULAR>{ font_size: 11.0 }
            }
        }
    }

    // Bar shown while the backend synthesizes
    ProgressStripe = <View> {
        width: Fill, height: 6
        show_bg: true
        draw_bg: {
            fn pixel(self) -> vec4 {
                let sdf = Sdf2d::viewport(self.pos * self.rect_size);
                sdf.box(0.0, 0.0, self.rect_size.x, self.rect_size.y, 3.0);
                sdf.fill(mix((INDIGO_500), (INDIGO_100), self.pos.x));
                return sdf.result;
            }
        }
    }

    pub TtsApp = {{TtsApp}} {
        width: Fill, height: Fill
        flow: Overlay
        show_bg: true
        draw_bg: { color: (PAGE_BG) }

        content = <ScrollYView> {
            width: Fill, height: Fill
            flow: Down
            padding: {left: 32, right: 32, top: 24, bottom: 32}

            // ── Header with stats ────────────────────────────────────────
            header = <View> {
                width: Fill, height: Fit
                flow: Right
                align: {y: 0.5}
                margin: {bottom: 20}

                <View> {
                    width: Fill, height: Fit
                    flow: Down
                    spacing: 4
                    <Label> {
                        text: "Piper TTS"
                        draw_text: {
                            color: (TEXT_PRIMARY)
                            text_style: <FONT_SEMIBOLD>{ font_size: 22.0 }
                        }
                    }
                    <HintText> { text: "Convierte texto en voz con voces en español" }
                }

                male_stat = <StatBadge> { caption = { text: "Voces masculinas" } }
                female_stat = <StatBadge> { caption = { text: "Voces femeninas" } }
            }

            // ── Text ─────────────────────────────────────────────────────
            text_card = <Card> {
                <SectionTitle> { text: "Texto", margin: {bottom: 12} }

                upload_area = <UploadArea> {}

                text_container = <View> {
                    width: Fill, height: 220
                    padding: 10
                    show_bg: true
                    draw_bg: {
                        fn pixel(self) -> vec4 {
                            let sdf = Sdf2d::viewport(self.pos * self.rect_size);
                            sdf.box(0.5, 0.5, self.rect_size.x - 1.0, self.rect_size.y - 1.0, 8.0);
                            sdf.fill((WHITE));
                            sdf.box(0.5, 0.5, self.rect_size.x - 1.0, self.rect_size.y - 1.0, 8.0);
                            sdf.stroke((SLATE_300), 1.0);
                            return sdf.result;
                        }
                    }

                    text_input = <TextInput> {
                        width: Fill, height: Fill
                        empty_text: "Escribe o pega el texto que quieres convertir en voz..."
                        draw_text: {
                            color: (TEXT_PRIMARY)
                            color_focus: (TEXT_PRIMARY)
                            color_empty: (TEXT_MUTED)
                            color_empty_focus: (TEXT_MUTED)
                            text_style: <FONT_REGULAR>{ font_size: 12.0 }
                        }
                        draw_bg: {
                            fn pixel(self) -> vec4 { return vec4(0.0, 0.0, 0.0, 0.0); }
                        }
                        draw_selection: { color: (INDIGO_100) color_focus: (INDIGO_100) }
                        draw_cursor: { color: (TEXT_PRIMARY) }
                    }
                }

                char_row = <View> {
                    width: Fill, height: Fit
                    flow: Right
                    align: {x: 1.0}
                    margin: {top: 6}
                    spacing: 4
                    char_count = <CharCounter> {}
                    <HintText> { text: "caracteres" }
                }
            }

            // ── Voice ────────────────────────────────────────────────────
            voice_card = <Card> {
                <SectionTitle> { text: "Voz", margin: {bottom: 12} }

                selectors_row = <View> {
                    width: Fill, height: Fit
                    flow: Right
                    spacing: 16
                    margin: {bottom: 16}

                    <View> {
                        width: Fill, height: Fit
                        flow: Down
                        <FieldLabel> { text: "Género" }
                        gender_dropdown = <FormDropDown> {
                            selected_item: 0
                        }
                    }

                    <View> {
                        width: Fill, height: Fit
                        flow: Down
                        <FieldLabel> { text: "Voz" }
                        voice_dropdown = <FormDropDown> {
                            visible: false
                            labels: ["Seleccionar voz"]
                            selected_item: 0
                        }
                        voice_placeholder = <DisabledSelect> {
                            placeholder_label = { text: "Primero selecciona un género" }
                        }
                    }
                }

                speed_row = <View> {
                    width: Fill, height: Fit
                    flow: Down

                    <View> {
                        width: Fill, height: Fit
                        flow: Right
                        <FieldLabel> { width: Fill, text: "Velocidad" }
                        speed_value = <Label> {
                            text: "1.0x (Normal)"
                            draw_text: {
                                color: (INDIGO_600)
                                text_style: <FONT_MEDIUM>{ font_size: 11.0 }
                            }
                        }
                    }
                    speed_slider = <Slider> {
                        width: Fill
                        text: ""
                        min: 0.5
                        max: 2.0
                        step: 0.1
                        default: 1.0
                        precision: 1
                    }
                }
            }

            // ── Actions ──────────────────────────────────────────────────
            actions_row = <View> {
                width: Fill, height: Fit
                flow: Right
                margin: {bottom: 16}

                generate_btn = <PrimaryButton> {
                    text: "Generar audio"
                    draw_bg: { disabled: 1.0 }
                }
                clear_btn = <SecondaryButton> { text: "Limpiar" }
            }

            // ── Progress (hidden until a synthesis starts) ───────────────
            progress_section = <Card> {
                visible: false
                spacing: 10
                <BodyText> { text: "Generando audio, esto puede tardar unos segundos..." }
                <ProgressStripe> {}
            }

            // ── Result (hidden until a synthesis succeeds) ───────────────
            result_section = <Card> {
                visible: false
                <SectionTitle> { text: "Audio generado", margin: {bottom: 8} }
                result_info = <BodyText> { margin: {bottom: 4} }
                audio_src = <HintText> { margin: {bottom: 12} }

                <View> {
                    width: Fill, height: Fit
                    flow: Right
                    play_btn = <SecondaryButton> { text: "▶ Reproducir" }
                    download_btn = <PrimaryButton> { text: "Descargar" }
                }
            }
        }

        // ── Notifications, stacked in the top-right corner ───────────────
        notifications = <View> {
            width: Fill, height: Fill
            flow: Down
            align: {x: 1.0, y: 0.0}
            padding: {top: 20, right: 20}

            notif_0 = <NotificationBanner> { visible: false }
            notif_1 = <NotificationBanner> { visible: false }
            notif_2 = <NotificationBanner> { visible: false }
            notif_3 = <NotificationBanner> { visible: false }
        }
    }
}
