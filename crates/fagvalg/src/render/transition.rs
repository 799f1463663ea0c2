use crate::presenter::navigator::{Exit, ExitSide};

pub fn ease_in_out(t: f32) -> f32 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

/// Horizontal offsets of the leaving and the entering slide while `exit` is
/// animating, or `None` once the animation has run its course.
pub fn slide_offsets(exit: &Exit, now_ms: u64, duration_ms: u64, width: f32) -> Option<(f32, f32)> {
    let elapsed = now_ms.saturating_sub(exit.started_ms);
    if duration_ms == 0 || elapsed >= duration_ms {
        return None;
    }
    let progress = ease_in_out(elapsed as f32 / duration_ms as f32);
    let sign = match exit.side {
        ExitSide::Left => -1.0,
        ExitSide::Right => 1.0,
    };
    let from_offset = sign * progress * width;
    let to_offset = from_offset - sign * width;
    Some((from_offset, to_offset))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exit(side: ExitSide) -> Exit {
        Exit {
            slide: 1,
            side,
            started_ms: 1_000,
        }
    }

    #[test]
    fn test_ease_endpoints() {
        assert_eq!(ease_in_out(0.0), 0.0);
        assert_eq!(ease_in_out(1.0), 1.0);
        assert!((ease_in_out(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_forward_exit_moves_left() {
        let (from, to) = slide_offsets(&exit(ExitSide::Left), 1_000, 400, 100.0).unwrap();
        assert_eq!(from, 0.0);
        assert_eq!(to, 100.0);
        let (from, to) = slide_offsets(&exit(ExitSide::Left), 1_200, 400, 100.0).unwrap();
        assert!((from + 50.0).abs() < 1e-3);
        assert!((to - 50.0).abs() < 1e-3);
    }

    #[test]
    fn test_backward_exit_moves_right() {
        let (from, to) = slide_offsets(&exit(ExitSide::Right), 1_000, 400, 100.0).unwrap();
        assert_eq!(from, 0.0);
        assert_eq!(to, -100.0);
    }

    #[test]
    fn test_finished_or_disabled() {
        assert!(slide_offsets(&exit(ExitSide::Left), 1_400, 400, 100.0).is_none());
        assert!(slide_offsets(&exit(ExitSide::Left), 1_000, 0, 100.0).is_none());
    }
}
