use eframe::egui::{Rect, Vec2};

/// World-to-screen mapping: `screen = world * scale + translate`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ViewTransform {
    pub(crate) translate: Vec2,
    pub(crate) scale: f32,
}

impl ViewTransform {
    pub(crate) const IDENTITY: Self = Self {
        translate: Vec2::ZERO,
        scale: 1.0,
    };

    /// Transform that puts `world` at `screen` under `scale`.
    pub(crate) fn centering(world: Vec2, screen: Vec2, scale: f32) -> Self {
        Self {
            translate: screen - world * scale,
            scale,
        }
    }

    pub(crate) fn apply(self, world: Vec2) -> Vec2 {
        world * self.scale + self.translate
    }

    pub(crate) fn invert(self, screen: Vec2) -> Vec2 {
        (screen - self.translate) / self.scale.max(f32::EPSILON)
    }

    /// World region that lands inside `screen` under this transform.
    pub(crate) fn invert_rect(self, screen: Rect) -> Rect {
        let min = self.invert(screen.min.to_vec2());
        let max = self.invert(screen.max.to_vec2());
        Rect::from_two_pos(min.to_pos2(), max.to_pos2())
    }

    fn lerp(self, other: Self, t: f32) -> Self {
        Self {
            translate: self.translate + (other.translate - self.translate) * t,
            scale: self.scale + (other.scale - self.scale) * t,
        }
    }
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

fn ease_cubic_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

#[derive(Clone, Copy, Debug)]
struct Animation {
    from: ViewTransform,
    to: ViewTransform,
    elapsed: f32,
    duration: f32,
}

/// Current view transform plus at most one animation toward a target.
///
/// While an animation runs, new requests are refused rather than queued.
#[derive(Clone, Debug, Default)]
pub(crate) struct TransformState {
    current: ViewTransform,
    animation: Option<Animation>,
}

impl TransformState {
    pub(crate) fn current(&self) -> ViewTransform {
        self.current
    }

    /// Where the view ends up once the running animation, if any, finishes.
    pub(crate) fn target(&self) -> ViewTransform {
        self.animation.map_or(self.current, |animation| animation.to)
    }

    pub(crate) fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    pub(crate) fn request(&mut self, to: ViewTransform, duration: f32) -> bool {
        if self.animation.is_some() {
            log::debug!("view transition already running, dropping request");
            return false;
        }
        if duration <= 0.0 {
            self.current = to;
            return true;
        }
        self.animation = Some(Animation {
            from: self.current,
            to,
            elapsed: 0.0,
            duration,
        });
        true
    }

    /// Drops any running animation and snaps back to the identity view.
    pub(crate) fn reset(&mut self) {
        self.animation = None;
        self.current = ViewTransform::IDENTITY;
    }

    /// Advances the running animation. Returns `true` on the tick it ends.
    pub(crate) fn advance(&mut self, dt: f32) -> bool {
        let Some(animation) = self.animation.as_mut() else {
            return false;
        };

        animation.elapsed += dt.max(0.0);
        let progress = animation.elapsed / animation.duration;
        if progress >= 1.0 {
            self.current = animation.to;
            self.animation = None;
            return true;
        }

        self.current = animation.from.lerp(animation.to, ease_cubic_in_out(progress));
        false
    }
}
