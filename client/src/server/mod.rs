//! Chain connection plugin.
//!
//! Owns the burner set, the node connection worker and the replicated
//! on-chain view the HUD renders. Requests are fire-and-forget; outcomes and
//! component snapshots come back as events drained once per frame.

use bevy::prelude::*;

use chain::{
    BurnerManager, ChainConfig, ChainConnection, ChainEvent, ChainRequest, EntityId,
    entity_id_from_address, resolve_burners_file, resolve_rpc_url,
};
use shared::{DirectionsAvailable, Moves, Position};

use crate::hud::ShowBanner;

/// Seconds between component refreshes for the active entity.
const REFRESH_PERIOD: f32 = 2.0;

/// Handle to the connection worker. `None` when the node URL was rejected at
/// startup; every submit then degrades to a logged no-op.
#[derive(Resource)]
pub struct ChainLink(Option<ChainConnection>);

impl ChainLink {
    pub fn submit(&self, request: ChainRequest) {
        match &self.0 {
            Some(connection) => connection.submit(request),
            None => warn!("no chain connection; {request:?} dropped"),
        }
    }

    fn connection(&self) -> Option<&ChainConnection> {
        self.0.as_ref()
    }
}

/// The locally-held burner accounts.
#[derive(Resource)]
pub struct Burners(pub BurnerManager);

/// Latest replicated component values for the active entity.
///
/// `None` fields mean the entity has not spawned yet (or the view was just
/// re-pointed at another account); values may be stale between refreshes.
#[derive(Resource, Default)]
pub struct GameStateView {
    pub entity: Option<EntityId>,
    pub position: Option<Position>,
    pub moves: Option<Moves>,
    pub directions: Option<DirectionsAvailable>,
}

impl GameStateView {
    /// Switch to a new active entity, dropping any stale component values.
    pub fn reset_for(&mut self, entity: Option<EntityId>) {
        *self = Self {
            entity,
            ..Self::default()
        };
    }
}

#[derive(Resource)]
struct RefreshTimer(Timer);

pub(super) fn plugin(app: &mut App) {
    let rpc_url = resolve_rpc_url(
        std::env::args().skip(1),
        std::env::var("GRIDWALK_RPC_URL").ok(),
    );
    let link = match ChainConnection::connect(ChainConfig {
        rpc_url: rpc_url.clone(),
    }) {
        Ok(connection) => {
            info!("chain connection worker started for {rpc_url}");
            ChainLink(Some(connection))
        }
        Err(err) => {
            warn!("chain unavailable at {rpc_url}: {err}");
            ChainLink(None)
        }
    };

    let mut burners = BurnerManager::new();
    seed_burners(&mut burners);

    let mut view = GameStateView::default();
    if let Some(account) = burners.selected() {
        let entity = entity_id_from_address(&account.address);
        link.submit(ChainRequest::Refresh {
            entity: entity.clone(),
        });
        view.entity = Some(entity);
    }

    app.insert_resource(link);
    app.insert_resource(Burners(burners));
    app.insert_resource(view);
    app.insert_resource(RefreshTimer(Timer::from_seconds(
        REFRESH_PERIOD,
        TimerMode::Repeating,
    )));

    app.add_systems(PreUpdate, drain_events);
    app.add_systems(Update, periodic_refresh);
}

/// Load burners from `--burners-file` when given, otherwise deploy one so
/// the player can act immediately.
fn seed_burners(burners: &mut BurnerManager) {
    if let Some(path) = resolve_burners_file(std::env::args().skip(1)) {
        match std::fs::read_to_string(&path) {
            Ok(payload) => match burners.apply_payload(payload.trim()) {
                Ok(count) => info!("restored {count} burner(s) from {path}"),
                Err(err) => warn!("burner seed file {path} rejected: {err}"),
            },
            Err(err) => warn!("cannot read burner seed file {path}: {err}"),
        }
    }

    if burners.count() == 0 {
        let address = burners.create().address.clone();
        info!("deployed burner {address}");
    }
}

/// Re-point the view and the refresh loop at the currently selected burner.
pub fn activate_selected(burners: &Burners, view: &mut GameStateView, link: &ChainLink) {
    match burners.0.selected() {
        Some(account) => {
            let entity = entity_id_from_address(&account.address);
            view.reset_for(Some(entity.clone()));
            link.submit(ChainRequest::Refresh { entity });
        }
        None => view.reset_for(None),
    }
}

fn drain_events(
    link: Res<ChainLink>,
    mut view: ResMut<GameStateView>,
    mut banners: MessageWriter<ShowBanner>,
) {
    let Some(connection) = link.connection() else {
        return;
    };

    for event in connection.try_events() {
        match event {
            ChainEvent::TxAccepted { op } => {
                info!("{} accepted", op.describe());
                // The write changed on-chain state; re-read right away
                // instead of waiting out the refresh period.
                if let Some(entity) = view.entity.clone() {
                    connection.submit(ChainRequest::Refresh { entity });
                }
            }
            ChainEvent::TxFailed { op, error } => {
                warn!("{} failed: {error}", op.describe());
                banners.write(ShowBanner::error(format!("{} failed", op.describe())));
            }
            ChainEvent::Snapshot {
                entity,
                position,
                moves,
                directions,
            } => {
                // Ignore snapshots for a previously selected account.
                if view.entity.as_ref() == Some(&entity) {
                    view.position = position;
                    view.moves = moves;
                    view.directions = directions;
                }
            }
        }
    }
}

fn periodic_refresh(
    time: Res<Time>,
    mut timer: ResMut<RefreshTimer>,
    link: Res<ChainLink>,
    view: Res<GameStateView>,
) {
    if !timer.0.tick(time.delta()).just_finished() {
        return;
    }
    if let Some(entity) = view.entity.clone() {
        link.submit(ChainRequest::Refresh { entity });
    }
}
