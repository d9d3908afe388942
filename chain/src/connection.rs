//! Background connection worker.
//!
//! The UI never talks to the node directly: it submits [`ChainRequest`]s on
//! a channel and drains [`ChainEvent`]s each frame. A dedicated thread owns
//! a tokio runtime and spawns one independent task per request, so calls are
//! fire-and-forget: nothing is queued behind anything else, rapid repeated
//! submissions produce multiple in-flight calls, and one failure neither
//! cancels other calls nor kills the worker.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, unbounded};
use serde_json::{Value, json};
use tracing::{debug, error, warn};

use shared::{Direction, DirectionsAvailable, Moves, Position};

use crate::config::ChainConfig;
use crate::entity::EntityId;
use crate::error::ChainError;
use crate::rpc::{
    COMPONENT_DIRECTIONS, COMPONENT_MOVES, COMPONENT_POSITION, JsonRpcTransport, METHOD_COMPONENT,
    METHOD_MOVE, METHOD_SPAWN, Transport,
};

/// How long the worker lets in-flight tasks settle during shutdown.
const SHUTDOWN_GRACE: Duration = Duration::from_millis(500);

/// A request submitted by the UI. All variants are fire-and-forget.
#[derive(Clone, Debug)]
pub enum ChainRequest {
    /// Spawn the player entity for the given account.
    Spawn { address: String },
    /// Submit a grid move for the given account.
    Move {
        address: String,
        direction: Direction,
    },
    /// Re-read the component snapshot for an entity.
    Refresh { entity: EntityId },
}

/// Which write operation an outcome event refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TxOp {
    Spawn,
    Move(Direction),
}

impl TxOp {
    pub fn describe(self) -> &'static str {
        match self {
            TxOp::Spawn => "spawn",
            TxOp::Move(Direction::Up) => "move up",
            TxOp::Move(Direction::Down) => "move down",
            TxOp::Move(Direction::Left) => "move left",
            TxOp::Move(Direction::Right) => "move right",
        }
    }
}

/// Events emitted by the worker, drained by the UI each frame.
#[derive(Debug)]
pub enum ChainEvent {
    TxAccepted {
        op: TxOp,
    },
    TxFailed {
        op: TxOp,
        error: String,
    },
    /// The current component values for an entity. `None` fields mean the
    /// entity has not spawned yet.
    Snapshot {
        entity: EntityId,
        position: Option<Position>,
        moves: Option<Moves>,
        directions: Option<DirectionsAvailable>,
    },
}

/// Handle to the connection worker.
///
/// Dropping the handle closes the request channel; the worker thread then
/// drains, gives in-flight tasks a short grace period and exits.
pub struct ChainConnection {
    requests: Sender<ChainRequest>,
    events: Receiver<ChainEvent>,
    worker: thread::JoinHandle<()>,
}

impl ChainConnection {
    /// Connects to the node named by `config` over HTTP JSON-RPC.
    pub fn connect(config: ChainConfig) -> Result<Self, ChainError> {
        let transport = JsonRpcTransport::new(&config.rpc_url)?;
        Self::with_transport(transport)
    }

    /// Starts the worker over an arbitrary transport.
    pub fn with_transport<T: Transport>(transport: T) -> Result<Self, ChainError> {
        let (request_tx, request_rx) = unbounded();
        let (event_tx, event_rx) = unbounded();

        let worker = thread::Builder::new()
            .name("chain-worker".into())
            .spawn(move || worker_loop(transport, request_rx, event_tx))
            .map_err(|err| ChainError::Transport(format!("failed to start worker: {err}")))?;

        Ok(Self {
            requests: request_tx,
            events: event_rx,
            worker,
        })
    }

    /// Submits a request without blocking. The outcome, if any, arrives
    /// later as a [`ChainEvent`].
    pub fn submit(&self, request: ChainRequest) {
        if self.requests.send(request).is_err() {
            warn!("chain worker is gone; request dropped");
        }
    }

    /// Drains every event currently pending, without blocking.
    pub fn try_events(&self) -> crossbeam_channel::TryIter<'_, ChainEvent> {
        self.events.try_iter()
    }

    /// Closes the request channel and waits for the worker to exit.
    pub fn shutdown(self) {
        let Self {
            requests,
            events: _events,
            worker,
        } = self;
        drop(requests);
        if worker.join().is_err() {
            warn!("chain worker panicked during shutdown");
        }
    }
}

fn worker_loop<T: Transport>(
    transport: T,
    requests: Receiver<ChainRequest>,
    events: Sender<ChainEvent>,
) {
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            error!("failed to start chain runtime: {err}");
            return;
        }
    };

    let transport = Arc::new(transport);
    while let Ok(request) = requests.recv() {
        let transport = Arc::clone(&transport);
        let events = events.clone();
        runtime.spawn(async move {
            handle_request(&*transport, &events, request).await;
        });
    }

    // Request channel closed: let in-flight tasks settle, then tear down.
    runtime.shutdown_timeout(SHUTDOWN_GRACE);
}

async fn handle_request<T: Transport>(
    transport: &T,
    events: &Sender<ChainEvent>,
    request: ChainRequest,
) {
    match request {
        ChainRequest::Spawn { address } => {
            submit_tx(transport, events, TxOp::Spawn, METHOD_SPAWN, vec![json!(address)]).await;
        }
        ChainRequest::Move { address, direction } => {
            submit_tx(
                transport,
                events,
                TxOp::Move(direction),
                METHOD_MOVE,
                vec![json!(address), json!(direction.code())],
            )
            .await;
        }
        ChainRequest::Refresh { entity } => match fetch_snapshot(transport, &entity).await {
            Ok((position, moves, directions)) => {
                let _ = events.send(ChainEvent::Snapshot {
                    entity,
                    position,
                    moves,
                    directions,
                });
            }
            Err(err) => {
                // Stale UI values stay on screen; the next refresh retries.
                warn!("component refresh for {entity} failed: {err}");
            }
        },
    }
}

async fn submit_tx<T: Transport>(
    transport: &T,
    events: &Sender<ChainEvent>,
    op: TxOp,
    method: &'static str,
    params: Vec<Value>,
) {
    match transport.call(method, params).await {
        Ok(_ack) => {
            debug!("{} accepted by node", op.describe());
            let _ = events.send(ChainEvent::TxAccepted { op });
        }
        Err(err) => {
            warn!("{} rejected: {err}", op.describe());
            let _ = events.send(ChainEvent::TxFailed {
                op,
                error: err.to_string(),
            });
        }
    }
}

async fn fetch_snapshot<T: Transport>(
    transport: &T,
    entity: &EntityId,
) -> Result<
    (
        Option<Position>,
        Option<Moves>,
        Option<DirectionsAvailable>,
    ),
    ChainError,
> {
    let position = fetch_component::<Position, _>(transport, entity, COMPONENT_POSITION).await?;
    let moves = fetch_component::<Moves, _>(transport, entity, COMPONENT_MOVES).await?;
    let directions =
        fetch_component::<DirectionsAvailable, _>(transport, entity, COMPONENT_DIRECTIONS).await?;
    Ok((position, moves, directions))
}

async fn fetch_component<C, T>(
    transport: &T,
    entity: &EntityId,
    name: &'static str,
) -> Result<Option<C>, ChainError>
where
    C: serde::de::DeserializeOwned,
    T: Transport,
{
    let value = transport
        .call(METHOD_COMPONENT, vec![json!(entity.as_str()), json!(name)])
        .await?;

    if value.is_null() {
        return Ok(None);
    }

    serde_json::from_value(value)
        .map(Some)
        .map_err(|err| ChainError::BadResponse {
            method: METHOD_COMPONENT,
            reason: format!("{name}: {err}"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::entity_id_from_address;
    use shared::GridVec;
    use std::sync::Mutex;

    /// Records every call; optionally fails writes or serves empty components.
    #[derive(Clone, Default)]
    struct RecordingTransport {
        calls: Arc<Mutex<Vec<(&'static str, Vec<Value>)>>>,
        fail_writes: bool,
        not_spawned: bool,
    }

    #[async_trait::async_trait]
    impl Transport for RecordingTransport {
        async fn call(
            &self,
            method: &'static str,
            params: Vec<Value>,
        ) -> Result<Value, ChainError> {
            self.calls.lock().unwrap().push((method, params.clone()));

            if method != METHOD_COMPONENT {
                if self.fail_writes {
                    return Err(ChainError::Transport("node unreachable".into()));
                }
                return Ok(json!("ok"));
            }

            if self.not_spawned {
                return Ok(Value::Null);
            }
            Ok(match params[1].as_str().unwrap() {
                COMPONENT_POSITION => json!({"vec": {"x": 10, "y": 10}}),
                COMPONENT_MOVES => json!({"remaining": 99, "last_direction": "Up"}),
                COMPONENT_DIRECTIONS => json!({"directions": ["Up", "Left"]}),
                _ => Value::Null,
            })
        }
    }

    fn recv_event(conn: &ChainConnection) -> ChainEvent {
        conn.events
            .recv_timeout(Duration::from_secs(5))
            .expect("no event within timeout")
    }

    #[test]
    fn move_reaches_the_transport_with_canonical_params() {
        let transport = RecordingTransport::default();
        let calls = Arc::clone(&transport.calls);
        let conn = ChainConnection::with_transport(transport).unwrap();

        conn.submit(ChainRequest::Move {
            address: "0xabc".into(),
            direction: Direction::Right,
        });

        match recv_event(&conn) {
            ChainEvent::TxAccepted { op } => assert_eq!(op, TxOp::Move(Direction::Right)),
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(
            calls
                .lock()
                .unwrap()
                .contains(&(METHOD_MOVE, vec![json!("0xabc"), json!(2)]))
        );
        conn.shutdown();
    }

    #[test]
    fn spawn_sends_only_the_address() {
        let transport = RecordingTransport::default();
        let calls = Arc::clone(&transport.calls);
        let conn = ChainConnection::with_transport(transport).unwrap();

        conn.submit(ChainRequest::Spawn {
            address: "0xdef".into(),
        });

        match recv_event(&conn) {
            ChainEvent::TxAccepted { op } => assert_eq!(op, TxOp::Spawn),
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(calls.lock().unwrap().contains(&(METHOD_SPAWN, vec![json!("0xdef")])));
        conn.shutdown();
    }

    #[test]
    fn refresh_parses_the_component_snapshot() {
        let conn = ChainConnection::with_transport(RecordingTransport::default()).unwrap();
        let entity = entity_id_from_address("0xabc");

        conn.submit(ChainRequest::Refresh {
            entity: entity.clone(),
        });

        match recv_event(&conn) {
            ChainEvent::Snapshot {
                entity: got,
                position,
                moves,
                directions,
            } => {
                assert_eq!(got, entity);
                assert_eq!(
                    position,
                    Some(Position {
                        vec: GridVec { x: 10, y: 10 }
                    })
                );
                let moves = moves.unwrap();
                assert_eq!(moves.remaining, 99);
                assert_eq!(moves.last_direction, Some(Direction::Up));
                assert_eq!(
                    directions.unwrap().directions,
                    vec![Direction::Up, Direction::Left]
                );
            }
            other => panic!("unexpected event: {other:?}"),
        }
        conn.shutdown();
    }

    #[test]
    fn unspawned_entity_yields_an_empty_snapshot() {
        let transport = RecordingTransport {
            not_spawned: true,
            ..RecordingTransport::default()
        };
        let conn = ChainConnection::with_transport(transport).unwrap();

        conn.submit(ChainRequest::Refresh {
            entity: entity_id_from_address("0xabc"),
        });

        match recv_event(&conn) {
            ChainEvent::Snapshot {
                position,
                moves,
                directions,
                ..
            } => {
                assert_eq!(position, None);
                assert_eq!(moves, None);
                assert_eq!(directions, None);
            }
            other => panic!("unexpected event: {other:?}"),
        }
        conn.shutdown();
    }

    #[test]
    fn a_failed_write_reports_and_the_worker_keeps_serving() {
        let transport = RecordingTransport {
            fail_writes: true,
            ..RecordingTransport::default()
        };
        let conn = ChainConnection::with_transport(transport).unwrap();

        conn.submit(ChainRequest::Spawn {
            address: "0xabc".into(),
        });
        match recv_event(&conn) {
            ChainEvent::TxFailed { op, error } => {
                assert_eq!(op, TxOp::Spawn);
                assert!(error.contains("node unreachable"));
            }
            other => panic!("unexpected event: {other:?}"),
        }

        // Reads still work after the failed write.
        conn.submit(ChainRequest::Refresh {
            entity: entity_id_from_address("0xabc"),
        });
        assert!(matches!(recv_event(&conn), ChainEvent::Snapshot { .. }));
        conn.shutdown();
    }

    #[test]
    fn rapid_submissions_all_reach_the_transport() {
        let transport = RecordingTransport::default();
        let calls = Arc::clone(&transport.calls);
        let conn = ChainConnection::with_transport(transport).unwrap();

        for direction in Direction::ALL {
            conn.submit(ChainRequest::Move {
                address: "0xabc".into(),
                direction,
            });
        }
        for _ in 0..4 {
            assert!(matches!(recv_event(&conn), ChainEvent::TxAccepted { .. }));
        }

        let calls = calls.lock().unwrap();
        for direction in Direction::ALL {
            assert!(
                calls.contains(&(METHOD_MOVE, vec![json!("0xabc"), json!(direction.code())])),
                "missing move call for {direction:?}"
            );
        }
        conn.shutdown();
    }
}
