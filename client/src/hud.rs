//! HUD panels: burner management, the on-chain game view, the move pad and
//! the transient status banner.
//!
//! Every button submits at most one fire-and-forget chain request; nothing
//! here waits on a call, and rapid clicks simply produce multiple in-flight
//! requests.

use bevy::prelude::*;

use chain::{ChainError, ChainRequest};
use shared::{Direction, STATUS_BANNER_SECS, border_blocks_move};

use crate::server::{Burners, ChainLink, GameStateView, activate_selected};

const PANEL_BG: Color = Color::srgba(0.08, 0.09, 0.11, 0.92);
const BUTTON_BG: Color = Color::srgb(0.17, 0.19, 0.23);
const BUTTON_BG_HOVER: Color = Color::srgb(0.24, 0.27, 0.32);
const BUTTON_BG_PRESSED: Color = Color::srgb(0.12, 0.13, 0.16);
const BANNER_OK_BG: Color = Color::srgb(0.13, 0.42, 0.22);
const BANNER_ERR_BG: Color = Color::srgb(0.52, 0.14, 0.14);
const TEXT_COLOR: Color = Color::srgb(0.92, 0.92, 0.90);
const LABEL_COLOR: Color = Color::srgb(0.62, 0.65, 0.70);

/// Request to show a transient status banner.
#[derive(Message)]
pub struct ShowBanner {
    pub text: String,
    pub is_error: bool,
}

impl ShowBanner {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

/// Banner currently on screen, if any. Cleared on a fixed timer regardless
/// of what the triggering call is still doing.
#[derive(Resource, Default)]
struct StatusBanner {
    message: Option<(String, bool)>,
    timer: Timer,
}

#[derive(Component, Clone, Copy, PartialEq, Eq)]
enum HudButton {
    Spawn,
    Move(Direction),
    NextSigner,
    NewBurner,
    ClearBurners,
    RestoreBurners,
    SaveBurners,
}

#[derive(Component, Clone, Copy, PartialEq, Eq)]
enum HudText {
    BurnerCount,
    Signer,
    MovesLeft,
    GridPosition,
    LastDirection,
    DirectionsAvailable,
    Banner,
}

#[derive(Component)]
struct BannerRoot;

pub(super) fn plugin(app: &mut App) {
    app.add_message::<ShowBanner>();
    app.init_resource::<StatusBanner>();
    app.add_systems(Startup, setup_hud);
    app.add_systems(
        Update,
        (
            handle_buttons,
            button_feedback,
            show_banners,
            expire_banner,
            refresh_texts,
        ),
    );
}

fn setup_hud(mut commands: Commands) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(12.0),
                right: Val::Px(12.0),
                width: Val::Px(280.0),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(6.0),
                padding: UiRect::all(Val::Px(12.0)),
                ..default()
            },
            BackgroundColor(PANEL_BG),
        ))
        .with_children(|panel| {
            panel.spawn(section_label("Burners"));
            panel.spawn(text_line(HudText::BurnerCount, "burners deployed: 0"));
            panel.spawn(text_line(HudText::Signer, "signer: none"));
            panel.spawn(hud_button(HudButton::NextSigner, "Next signer"));
            panel.spawn(hud_button(HudButton::NewBurner, "New burner"));
            panel.spawn(hud_button(HudButton::RestoreBurners, "Restore from clipboard"));
            panel.spawn(hud_button(HudButton::SaveBurners, "Copy to clipboard"));
            panel.spawn(hud_button(HudButton::ClearBurners, "Clear burners"));

            panel.spawn(section_label("Game"));
            panel.spawn(hud_button(HudButton::Spawn, "Spawn"));
            panel.spawn(text_line(HudText::MovesLeft, "moves left: need to spawn"));
            panel.spawn(text_line(HudText::GridPosition, "position: need to spawn"));
            panel.spawn(text_line(HudText::LastDirection, "last move: -"));
            panel.spawn(text_line(HudText::DirectionsAvailable, "can move: -"));

            panel.spawn(section_label("Move"));
            panel.spawn(hud_button(HudButton::Move(Direction::Up), "Move up"));
            panel
                .spawn(Node {
                    flex_direction: FlexDirection::Row,
                    column_gap: Val::Px(6.0),
                    ..default()
                })
                .with_children(|row| {
                    row.spawn(hud_button(HudButton::Move(Direction::Left), "Move left"));
                    row.spawn(hud_button(HudButton::Move(Direction::Right), "Move right"));
                });
            panel.spawn(hud_button(HudButton::Move(Direction::Down), "Move down"));
        });

    // Banner, centered along the top edge, hidden until a message arrives.
    commands
        .spawn(Node {
            position_type: PositionType::Absolute,
            top: Val::Px(12.0),
            left: Val::Px(0.0),
            right: Val::Px(0.0),
            justify_content: JustifyContent::Center,
            ..default()
        })
        .with_children(|wrapper| {
            wrapper
                .spawn((
                    BannerRoot,
                    Node {
                        padding: UiRect::axes(Val::Px(16.0), Val::Px(8.0)),
                        ..default()
                    },
                    BackgroundColor(BANNER_OK_BG),
                    Visibility::Hidden,
                ))
                .with_children(|banner| {
                    banner.spawn((
                        HudText::Banner,
                        Text::new(""),
                        TextFont {
                            font_size: 15.0,
                            ..default()
                        },
                        TextColor(TEXT_COLOR),
                    ));
                });
        });
}

fn section_label(title: &'static str) -> impl Bundle {
    (
        Text::new(title),
        TextFont {
            font_size: 16.0,
            ..default()
        },
        TextColor(LABEL_COLOR),
        Node {
            margin: UiRect::top(Val::Px(8.0)),
            ..default()
        },
    )
}

fn text_line(kind: HudText, initial: &'static str) -> impl Bundle {
    (
        kind,
        Text::new(initial),
        TextFont {
            font_size: 13.0,
            ..default()
        },
        TextColor(TEXT_COLOR),
    )
}

fn hud_button(kind: HudButton, label: &'static str) -> impl Bundle {
    (
        Button,
        kind,
        Node {
            padding: UiRect::axes(Val::Px(10.0), Val::Px(6.0)),
            justify_content: JustifyContent::Center,
            ..default()
        },
        BackgroundColor(BUTTON_BG),
        children![(
            Text::new(label),
            TextFont {
                font_size: 13.0,
                ..default()
            },
            TextColor(TEXT_COLOR),
        )],
    )
}

fn handle_buttons(
    interactions: Query<(&Interaction, &HudButton), (Changed<Interaction>, With<Button>)>,
    mut burners: ResMut<Burners>,
    mut view: ResMut<GameStateView>,
    link: Res<ChainLink>,
    mut banners: MessageWriter<ShowBanner>,
) {
    for (interaction, button) in &interactions {
        if *interaction != Interaction::Pressed {
            continue;
        }
        match *button {
            HudButton::Spawn => match burners.0.selected() {
                Some(account) => link.submit(ChainRequest::Spawn {
                    address: account.address.clone(),
                }),
                None => {
                    banners.write(ShowBanner::error("no burner account selected"));
                }
            },
            HudButton::Move(direction) => {
                move_clicked(direction, &burners, &view, &link, &mut banners);
            }
            HudButton::NextSigner => {
                if burners.0.next().is_some() {
                    activate_selected(&burners, &mut view, &link);
                }
            }
            HudButton::NewBurner => {
                let address = burners.0.create().address.clone();
                activate_selected(&burners, &mut view, &link);
                banners.write(ShowBanner::info(format!(
                    "burner {} ready",
                    short_address(&address)
                )));
            }
            HudButton::ClearBurners => {
                burners.0.clear();
                activate_selected(&burners, &mut view, &link);
                banners.write(ShowBanner::info("burners cleared"));
            }
            HudButton::RestoreBurners => {
                restore_from_clipboard(&mut burners, &mut view, &link, &mut banners);
            }
            HudButton::SaveBurners => {
                save_to_clipboard(&burners, &mut banners);
            }
        }
    }
}

/// Submit a grid move for the active account.
///
/// The chain rejects moves past the grid edge, so those are suppressed
/// client-side with a diagnostic instead of a doomed transaction.
fn move_clicked(
    direction: Direction,
    burners: &Burners,
    view: &GameStateView,
    link: &ChainLink,
    banners: &mut MessageWriter<ShowBanner>,
) {
    let Some(account) = burners.0.selected() else {
        banners.write(ShowBanner::error("no burner account selected"));
        return;
    };

    if border_blocks_move(view.position.as_ref(), direction) {
        info!(
            "reached the border of the world; {} suppressed",
            direction.label()
        );
        return;
    }

    link.submit(ChainRequest::Move {
        address: account.address.clone(),
        direction,
    });
}

fn restore_from_clipboard(
    burners: &mut Burners,
    view: &mut GameStateView,
    link: &ChainLink,
    banners: &mut MessageWriter<ShowBanner>,
) {
    let text = arboard::Clipboard::new().and_then(|mut clipboard| clipboard.get_text());
    let payload = match text {
        Ok(payload) => payload,
        Err(err) => {
            warn!("clipboard unavailable: {err}");
            banners.write(ShowBanner::error("failed to restore burners from clipboard"));
            return;
        }
    };

    match burners.0.apply_payload(payload.trim()) {
        Ok(count) => {
            activate_selected(burners, view, link);
            banners.write(ShowBanner::info(format!("{count} burner(s) restored")));
        }
        Err(err) => {
            warn!("clipboard restore rejected: {err}");
            banners.write(ShowBanner::error("failed to restore burners from clipboard"));
        }
    }
}

fn save_to_clipboard(burners: &Burners, banners: &mut MessageWriter<ShowBanner>) {
    let result = burners.0.export_payload().and_then(|payload| {
        arboard::Clipboard::new()
            .and_then(|mut clipboard| clipboard.set_text(payload))
            .map_err(|err| ChainError::Payload(err.to_string()))
    });

    match result {
        Ok(()) => {
            banners.write(ShowBanner::info("burners copied to clipboard"));
        }
        Err(err) => {
            warn!("clipboard save failed: {err}");
            banners.write(ShowBanner::error("failed to copy burners to clipboard"));
        }
    }
}

fn button_feedback(
    mut buttons: Query<(&Interaction, &mut BackgroundColor), (Changed<Interaction>, With<Button>)>,
) {
    for (interaction, mut color) in &mut buttons {
        *color = BackgroundColor(match interaction {
            Interaction::Pressed => BUTTON_BG_PRESSED,
            Interaction::Hovered => BUTTON_BG_HOVER,
            Interaction::None => BUTTON_BG,
        });
    }
}

fn show_banners(
    mut messages: MessageReader<ShowBanner>,
    mut banner: ResMut<StatusBanner>,
    mut roots: Query<(&mut Visibility, &mut BackgroundColor), With<BannerRoot>>,
) {
    let Some(request) = messages.read().last() else {
        return;
    };

    banner.message = Some((request.text.clone(), request.is_error));
    banner.timer = Timer::from_seconds(STATUS_BANNER_SECS, TimerMode::Once);
    for (mut visibility, mut color) in &mut roots {
        *visibility = Visibility::Visible;
        *color = BackgroundColor(if request.is_error {
            BANNER_ERR_BG
        } else {
            BANNER_OK_BG
        });
    }
}

fn expire_banner(
    time: Res<Time>,
    mut banner: ResMut<StatusBanner>,
    mut roots: Query<&mut Visibility, With<BannerRoot>>,
) {
    if banner.message.is_none() {
        return;
    }
    banner.timer.tick(time.delta());
    if banner.timer.just_finished() {
        banner.message = None;
        for mut visibility in &mut roots {
            *visibility = Visibility::Hidden;
        }
    }
}

fn refresh_texts(
    burners: Res<Burners>,
    view: Res<GameStateView>,
    banner: Res<StatusBanner>,
    mut texts: Query<(&mut Text, &HudText)>,
) {
    if !burners.is_changed() && !view.is_changed() && !banner.is_changed() {
        return;
    }

    for (mut text, kind) in &mut texts {
        text.0 = match kind {
            HudText::BurnerCount => format!("burners deployed: {}", burners.0.count()),
            HudText::Signer => match burners.0.selected() {
                Some(account) => format!("signer: {}", short_address(&account.address)),
                None => "signer: none".to_string(),
            },
            HudText::MovesLeft => match &view.moves {
                Some(moves) => format!("moves left: {}", moves.remaining),
                None => "moves left: need to spawn".to_string(),
            },
            HudText::GridPosition => match &view.position {
                Some(position) => format!("position: {}, {}", position.vec.x, position.vec.y),
                None => "position: need to spawn".to_string(),
            },
            HudText::LastDirection => match view.moves.as_ref().and_then(|m| m.last_direction) {
                Some(direction) => format!("last move: {}", direction.label()),
                None => "last move: -".to_string(),
            },
            HudText::DirectionsAvailable => match &view.directions {
                Some(available) if !available.directions.is_empty() => format!(
                    "can move: {}",
                    available
                        .directions
                        .iter()
                        .map(|d| d.label())
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
                _ => "can move: -".to_string(),
            },
            HudText::Banner => match &banner.message {
                Some((message, _)) => message.clone(),
                None => String::new(),
            },
        };
    }
}

fn short_address(address: &str) -> String {
    if address.len() <= 12 {
        return address.to_string();
    }
    format!("{}…{}", &address[..8], &address[address.len() - 4..])
}
