use bevy::prelude::*;
use leafwing_input_manager::prelude::*;

use shared::DirectionalIntent;

/// Held-key movement actions for the local avatar.
#[derive(Reflect, Actionlike, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveAction {
    Forward,
    Backward,
    Left,
    Right,
}

/// Shared intent flags: written here on key transitions, read once per frame
/// by the integrator.
#[derive(Resource, Default, Debug)]
pub struct IntentState(pub DirectionalIntent);

pub(super) fn plugin(app: &mut App) {
    app.add_plugins(InputManagerPlugin::<MoveAction>::default());

    app.register_type::<MoveAction>();

    let mut input_map = InputMap::<MoveAction>::default();
    input_map.insert(MoveAction::Forward, KeyCode::KeyW);
    input_map.insert(MoveAction::Forward, KeyCode::ArrowUp);
    input_map.insert(MoveAction::Backward, KeyCode::KeyS);
    input_map.insert(MoveAction::Backward, KeyCode::ArrowDown);
    input_map.insert(MoveAction::Left, KeyCode::KeyA);
    input_map.insert(MoveAction::Left, KeyCode::ArrowLeft);
    input_map.insert(MoveAction::Right, KeyCode::KeyD);
    input_map.insert(MoveAction::Right, KeyCode::ArrowRight);
    app.insert_resource(input_map);
    app.insert_resource(ActionState::<MoveAction>::default());
    app.init_resource::<IntentState>();

    app.add_systems(Update, track_intent.before(crate::avatar::integrate));
}

/// Mirror the held action state into the shared intent flags.
///
/// `pressed` already reflects the net held state, so auto-repeated key-down
/// events cannot double-apply and unmapped keys never reach us.
fn track_intent(actions: Res<ActionState<MoveAction>>, mut intent: ResMut<IntentState>) {
    intent.0.forward = actions.pressed(&MoveAction::Forward);
    intent.0.backward = actions.pressed(&MoveAction::Backward);
    intent.0.left = actions.pressed(&MoveAction::Left);
    intent.0.right = actions.pressed(&MoveAction::Right);
}
