// TapWatch - Orientation Classifier
//
// Picks one of four screen quadrants from the accelerometer's X/Y axes.
// The dominant axis decides landscape vs portrait and its sign decides
// which way up. Inside the dead-zone nothing changes, so a watch lying
// flat keeps whatever face it last showed.

use crate::config::ORIENTATION_DEAD_ZONE;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Orientation {
    /// Landscape, display's default rotation.
    #[default]
    Horizontal0,
    Horizontal180,
    VerticalUp,
    VerticalDown,
}

impl Orientation {
    pub fn is_vertical(self) -> bool {
        matches!(self, Orientation::VerticalUp | Orientation::VerticalDown)
    }

    /// Panel rotation in 90° steps.
    pub fn quadrant(self) -> u8 {
        match self {
            Orientation::Horizontal180 => 1,
            Orientation::VerticalUp => 2,
            Orientation::Horizontal0 => 3,
            Orientation::VerticalDown => 0,
        }
    }
}

/// Four-way classification with hysteresis against `current`.
pub fn classify(x: f32, y: f32, current: Orientation) -> Orientation {
    let (ax, ay) = (x.abs(), y.abs());

    if ax > ay {
        if x < -ORIENTATION_DEAD_ZONE {
            return Orientation::Horizontal0;
        }
        if x > ORIENTATION_DEAD_ZONE {
            return Orientation::Horizontal180;
        }
    } else if ay > ax {
        if y > ORIENTATION_DEAD_ZONE {
            return Orientation::VerticalUp;
        }
        if y < -ORIENTATION_DEAD_ZONE {
            return Orientation::VerticalDown;
        }
    }

    current
}

/// Coarse landscape-only pick used by menu-style screens.
pub fn horizontal_rotation(x: f32) -> Orientation {
    if x > 0.0 {
        Orientation::Horizontal180
    } else {
        Orientation::Horizontal0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dominant_axis_and_sign_pick_quadrant() {
        let start = Orientation::Horizontal0;
        assert_eq!(classify(-0.9, 0.2, start), Orientation::Horizontal0);
        assert_eq!(classify(0.9, -0.2, start), Orientation::Horizontal180);
        assert_eq!(classify(0.1, 0.8, start), Orientation::VerticalUp);
        assert_eq!(classify(-0.3, -0.8, start), Orientation::VerticalDown);
    }

    #[test]
    fn dead_zone_freezes_last_orientation() {
        assert_eq!(classify(0.05, -0.05, Orientation::VerticalUp), Orientation::VerticalUp);
        assert_eq!(classify(0.0, 0.0, Orientation::Horizontal180), Orientation::Horizontal180);
        // Dominant axis inside the dead-zone, other axis smaller still.
        assert_eq!(classify(-0.09, 0.02, Orientation::VerticalDown), Orientation::VerticalDown);
    }

    #[test]
    fn equal_magnitudes_keep_current() {
        assert_eq!(classify(0.5, 0.5, Orientation::Horizontal0), Orientation::Horizontal0);
        assert_eq!(classify(-0.5, 0.5, Orientation::VerticalDown), Orientation::VerticalDown);
    }

    #[test]
    fn classification_is_idempotent() {
        let mut o = Orientation::Horizontal0;
        for _ in 0..5 {
            o = classify(0.2, 0.7, o);
        }
        assert_eq!(o, Orientation::VerticalUp);
    }

    #[test]
    fn horizontal_rotation_ignores_y() {
        assert_eq!(horizontal_rotation(0.3), Orientation::Horizontal180);
        assert_eq!(horizontal_rotation(-0.3), Orientation::Horizontal0);
        assert_eq!(horizontal_rotation(0.0), Orientation::Horizontal0);
    }

    #[test]
    fn quadrants_are_distinct() {
        let all = [
            Orientation::Horizontal0,
            Orientation::Horizontal180,
            Orientation::VerticalUp,
            Orientation::VerticalDown,
        ];
        let mut q: Vec<u8> = all.iter().map(|o| o.quadrant()).collect();
        q.sort();
        assert_eq!(q, vec![0, 1, 2, 3]);
    }
}
