// Support configuring Bevy lints within code.
#![cfg_attr(bevy_lint, feature(register_tool), register_tool(bevy))]
// Disable console on Windows for non-dev builds.
#![cfg_attr(not(feature = "dev"), windows_subsystem = "windows")]

#[cfg(feature = "dev_native")]
mod debug_tools;

mod avatar;
mod camera;
mod hud;
mod input;
mod server;
mod world;

use bevy::prelude::*;

fn main() -> AppExit {
    App::new().add_plugins(AppPlugin).run()
}

pub struct AppPlugin;
impl Plugin for AppPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Window {
                title: "Gridwalk".to_string(),
                fit_canvas_to_parent: true,
                ..default()
            }
            .into(),
            ..default()
        }));

        app.add_plugins((
            server::plugin,
            world::plugin,
            avatar::plugin,
            input::plugin,
            camera::plugin,
            hud::plugin,
        ));

        #[cfg(feature = "dev_native")]
        app.add_plugins(debug_tools::plugin);
    }
}
