//! # Notifications - transient banners
//!
//! Every notification slides in, stays for [`VISIBLE_DURATION`], slides out
//! over [`LEAVE_DURATION`] and is then dropped. Notifications stack in the
//! order they were pushed; nothing is de-duplicated or queued.

use std::time::{Duration, Instant};

/// How long a notification stays on screen before it starts leaving.
pub const VISIBLE_DURATION: Duration = Duration::from_millis(4000);

/// Length of the slide-out animation (the slide-in uses the same length).
pub const LEAVE_DURATION: Duration = Duration::from_millis(300);

/// Horizontal distance, in pixels, a banner travels when sliding.
pub const SLIDE_DISTANCE: f64 = 400.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    #[default]
    Info,
}

impl NotificationKind {
    pub fn color_hex(self) -> &'static str {
        match self {
            Self::Success => "#10b981",
            Self::Error => "#ef4444",
            Self::Warning => "#f59e0b",
            Self::Info => "#6366f1",
        }
    }

    /// Color as linear `[r, g, b, a]` in 0..=1, for shaders.
    pub fn color_rgba(self) -> [f32; 4] {
        hex_to_rgba(self.color_hex())
    }
}

/// Where a notification is in its lifetime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NotificationPhase {
    /// Sliding in; `progress` goes 0 → 1.
    Entering { progress: f64 },
    Visible,
    /// Sliding out; `progress` goes 0 → 1.
    Leaving { progress: f64 },
    Expired,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub kind: NotificationKind,
    pub shown_at: Instant,
}

impl Notification {
    pub fn phase(&self, now: Instant) -> NotificationPhase {
        let age = now.saturating_duration_since(self.shown_at);
        let leave_at = VISIBLE_DURATION;
        let gone_at = VISIBLE_DURATION + LEAVE_DURATION;

        if age >= gone_at {
            NotificationPhase::Expired
        } else if age >= leave_at {
            NotificationPhase::Leaving {
                progress: fraction(age - leave_at, LEAVE_DURATION),
            }
        } else if age < LEAVE_DURATION {
            NotificationPhase::Entering {
                progress: fraction(age, LEAVE_DURATION),
            }
        } else {
            NotificationPhase::Visible
        }
    }

    /// 0.0 when fully on screen, 1.0 when fully off screen.
    pub fn slide_offset(&self, now: Instant) -> f64 {
        match self.phase(now) {
            NotificationPhase::Entering { progress } => 1.0 - progress,
            NotificationPhase::Visible => 0.0,
            NotificationPhase::Leaving { progress } => progress,
            NotificationPhase::Expired => 1.0,
        }
    }
}

/// Stack of live notifications.
#[derive(Debug, Clone, Default)]
pub struct NotificationCenter {
    next_id: u64,
    items: Vec<Notification>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>, kind: NotificationKind) -> u64 {
        self.push_at(message, kind, Instant::now())
    }

    pub fn push_at(
        &mut self,
        message: impl Into<String>,
        kind: NotificationKind,
        now: Instant,
    ) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        let message = message.into();
        log::debug!("Notification #{} ({:?}): {}", id, kind, message);
        self.items.push(Notification {
            id,
            message,
            kind,
            shown_at: now,
        });
        id
    }

    /// Drop expired notifications. Returns true if anything was removed.
    pub fn prune(&mut self, now: Instant) -> bool {
        let before = self.items.len();
        self.items
            .retain(|n| n.phase(now) != NotificationPhase::Expired);
        self.items.len() != before
    }

    /// Notifications in the order they were pushed.
    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    pub fn last(&self) -> Option<&Notification> {
        self.items.last()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn fraction(elapsed: Duration, total: Duration) -> f64 {
    (elapsed.as_secs_f64() / total.as_secs_f64()).clamp(0.0, 1.0)
}

fn hex_to_rgba(hex: &str) -> [f32; 4] {
    let hex = hex.trim_start_matches('#');
    let channel = |i: usize| {
        hex.get(i..i + 2)
            .and_then(|c| u8::from_str_radix(c, 16).ok())
            .map(|v| v as f32 / 255.0)
            .unwrap_or(0.0)
    };
    [channel(0), channel(2), channel(4), 1.0]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_lifecycle_boundaries() {
        let t0 = Instant::now();
        let mut center = NotificationCenter::new();
        center.push_at("Formulario limpiado", NotificationKind::Info, t0);
        let n = &center.items()[0];

        assert_eq!(n.phase(t0), NotificationPhase::Entering { progress: 0.0 });
        assert_eq!(n.phase(t0 + ms(300)), NotificationPhase::Visible);
        assert_eq!(n.phase(t0 + ms(3999)), NotificationPhase::Visible);
        assert_eq!(n.phase(t0 + ms(4000)), NotificationPhase::Leaving { progress: 0.0 });
        assert_eq!(n.phase(t0 + ms(4300)), NotificationPhase::Expired);
    }

    #[test]
    fn test_prune_removes_only_expired() {
        let t0 = Instant::now();
        let mut center = NotificationCenter::new();
        center.push_at("primero", NotificationKind::Success, t0);
        center.push_at("segundo", NotificationKind::Error, t0 + ms(2000));

        assert!(!center.prune(t0 + ms(4299)));
        assert_eq!(center.len(), 2);

        assert!(center.prune(t0 + ms(4300)));
        assert_eq!(center.len(), 1);
        assert_eq!(center.items()[0].message, "segundo");

        assert!(center.prune(t0 + ms(6300)));
        assert!(center.is_empty());
    }

    #[test]
    fn test_duplicates_stack() {
        let t0 = Instant::now();
        let mut center = NotificationCenter::new();
        let a = center.push_at("Error al procesar el archivo", NotificationKind::Error, t0);
        let b = center.push_at("Error al procesar el archivo", NotificationKind::Error, t0);

        assert_ne!(a, b);
        assert_eq!(center.len(), 2);
    }

    #[test]
    fn test_slide_offset() {
        let t0 = Instant::now();
        let mut center = NotificationCenter::new();
        center.push_at("hola", NotificationKind::Info, t0);
        let n = &center.items()[0];

        assert_eq!(n.slide_offset(t0), 1.0);
        assert_eq!(n.slide_offset(t0 + ms(1000)), 0.0);
        assert!((n.slide_offset(t0 + ms(4150)) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_kind_colors() {
        assert_eq!(NotificationKind::default(), NotificationKind::Info);
        assert_eq!(NotificationKind::Success.color_hex(), "#10b981");
        assert_eq!(NotificationKind::Warning.color_hex(), "#f59e0b");

        let [r, g, b, a] = NotificationKind::Error.color_rgba();
        assert!((r - 239.0 / 255.0).abs() < 1e-6);
        assert!((g - 68.0 / 255.0).abs() < 1e-6);
        assert!((b - 68.0 / 255.0).abs() < 1e-6);
        assert_eq!(a, 1.0);
    }
}
