use makepad_widgets::*;

live_design! {
    use link::theme::*;
    use link::shaders::*;
    use link::widgets::*;
    use crate::theme::*;

    // ========================================================================
    // TEXT STYLES
    // ========================================================================

    pub SectionTitle = <Label> {
        draw_text: {
            color: (TEXT_PRIMARY)
            text_style: <FONT_SEMIBOLD>{ font_size: 15.0 }
        }
    }

    pub FieldLabel = <Label> {
        margin: {bottom: 6}
        draw_text: {
            color: (TEXT_SECONDARY)
            text_style: <FONT_MEDIUM>{ font_size: 11.0 }
        }
    }

    pub BodyText = <Label> {
        draw_text: {
            color: (SLATE_700)
            text_style: <FONT_REGULAR>{ font_size: 11.0 }
            wrap: Word
        }
    }

    pub HintText = <Label> {
        draw_text: {
            color: (TEXT_MUTED)
            text_style: <FONT_REGULAR>{ font_size: 10.0 }
        }
    }

    // ========================================================================
    // CONTAINERS
    // ========================================================================

    // White rounded panel with a hairline border
    pub Card = <View> {
        width: Fill, height: Fit
        flow: Down
        padding: 20
        margin: {bottom: 16}
        show_bg: true
        draw_bg: {
            fn pixel(self) -> vec4 {
                let sdf = Sdf2d::viewport(self.pos * self.rect_size);
                sdf.box(0.5, 0.5, self.rect_size.x - 1.0, self.rect_size.y - 1.0, 10.0);
                sdf.fill((PANEL_BG));
                sdf.box(0.5, 0.5, self.rect_size.x - 1.0, self.rect_size.y - 1.0, 10.0);
                sdf.stroke((BORDER), 1.0);
                return sdf.result;
            }
        }
    }

    // Small counter pill: big number over a caption
    pub StatBadge = <View> {
        width: Fit, height: Fit
        flow: Down
        align: {x: 0.5}
        padding: {left: 14, right: 14, top: 6, bottom: 6}
        margin: {left: 8}
        show_bg: true
        draw_bg: {
            fn pixel(self) -> vec4 {
                let sdf = Sdf2d::viewport(self.pos * self.rect_size);
                sdf.box(0.0, 0.0, self.rect_size.x, self.rect_size.y, 8.0);
                sdf.fill((INDIGO_50));
                return sdf.result;
            }
        }
        value = <Label> {
            text: "0"
            draw_text: {
                color: (INDIGO_600)
                text_style: <FONT_SEMIBOLD>{ font_size: 16.0 }
            }
        }
        caption = <Label> {
            draw_text: {
                color: (TEXT_SECONDARY)
                text_style: <FONT_REGULAR>{ font_size: 9.0 }
            }
        }
    }

    // ========================================================================
    // BUTTONS
    // ========================================================================

    // Indigo call-to-action. `disabled` greys it out; clicks are still
    // delivered, the owner ignores them.
    pub PrimaryButton = <Button> {
        width: Fit, height: 38
        padding: {left: 20, right: 20, top: 8, bottom: 8}
        margin: {right: 8}
        animator: {
            hover = {
                default: off,
                off = { from: {all: Forward {duration: 0.15}} apply: { draw_bg: {hover: 0.0} } }
                on  = { from: {all: Forward {duration: 0.15}} apply: { draw_bg: {hover: 1.0} } }
            }
        }
        draw_bg: {
            instance hover: 0.0
            instance disabled: 0.0
            fn pixel(self) -> vec4 {
                let sdf = Sdf2d::viewport(self.pos * self.rect_size);
                sdf.box(0.0, 0.0, self.rect_size.x, self.rect_size.y, 8.0);
                let active = mix((INDIGO_500), (INDIGO_700), self.hover);
                sdf.fill(mix(active, (SLATE_300), self.disabled));
                return sdf.result;
            }
        }
        draw_text: {
            text_style: <FONT_MEDIUM>{ font_size: 12.0 }
            color: (WHITE)
        }
    }

    pub SecondaryButton = <Button> {
        width: Fit, height: 38
        padding: {left: 20, right: 20, top: 8, bottom: 8}
        margin: {right: 8}
        animator: {
            hover = {
                default: off,
                off = { from: {all: Forward {duration: 0.15}} apply: { draw_bg: {hover: 0.0} } }
                on  = { from: {all: Forward {duration: 0.15}} apply: { draw_bg: {hover: 1.0} } }
            }
        }
        draw_bg: {
            instance hover: 0.0
            fn pixel(self) -> vec4 {
                let sdf = Sdf2d::viewport(self.pos * self.rect_size);
                sdf.box(0.0, 0.0, self.rect_size.x, self.rect_size.y, 8.0);
                sdf.fill(mix((SLATE_100), (SLATE_200), self.hover));
                return sdf.result;
            }
        }
        draw_text: {
            text_style: <FONT_MEDIUM>{ font_size: 12.0 }
            color: (SLATE_700)
        }
    }

    // ========================================================================
    // NOTIFICATION BANNER
    // Colored toast; `accent` is set per kind, `slide` moves it off screen
    // to the right (0 = shown, 1 = hidden).
    // ========================================================================

    pub NotificationBanner = <View> {
        width: 340, height: Fit
        padding: {left: 16, right: 16, top: 12, bottom: 12}
        margin: {bottom: 8}
        show_bg: true
        draw_bg: {
            instance accent: vec4(0.388, 0.4, 0.945, 1.0)
            instance slide: 0.0
            fn pixel(self) -> vec4 {
                let sdf = Sdf2d::viewport(self.pos * self.rect_size);
                sdf.box(0.0, 0.0, self.rect_size.x, self.rect_size.y, 8.0);
                sdf.fill(self.accent);
                return sdf.result * (1.0 - self.slide);
            }
        }
        message = <Label> {
            width: Fill
            draw_text: {
                color: (WHITE)
                text_style: <FONT_MEDIUM>{ font_size: 11.0 }
                wrap: Word
            }
        }
    }
}
