use crate::engine::components::camera::{ CameraMovement, MovementPace };

/// Turns held movement keys into camera movements. Opposite keys cancel out.
pub fn movement_directions(
    forward: bool,
    backward: bool,
    left: bool,
    right: bool,
    up: bool,
    down: bool
) -> Vec<CameraMovement> {
    let axes = [
        (forward, backward, CameraMovement::Forward, CameraMovement::Backward),
        (left, right, CameraMovement::Left, CameraMovement::Right),
        (up, down, CameraMovement::Up, CameraMovement::Down),
    ];

    axes.into_iter()
        .filter_map(|(positive, negative, a, b)| {
            match (positive, negative) {
                (true, false) => Some(a),
                (false, true) => Some(b),
                _ => None, // both or neither
            }
        })
        .collect()
}

/// Shift takes precedence over Ctrl.
pub fn movement_pace(shift: bool, ctrl: bool) -> MovementPace {
    if shift {
        MovementPace::Fast
    } else if ctrl {
        MovementPace::Slow
    } else {
        MovementPace::Normal
    }
}
