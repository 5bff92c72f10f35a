use confab_audio::{AnalysisError, AudioTrack, SpectrumSource};
use confab_session::{
    ConnectionState, GrantProvider, RoomConnection, RoomEvent, RoomTransport, SessionController,
    SessionError, SessionIdentity, SessionPhase,
};
use confab_types::{BandLevels, ConnectionDetails};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{broadcast, Notify};
use tokio::time::{sleep, timeout, Duration};

const WAIT: Duration = Duration::from_secs(2);

struct MockGrants {
    issued: AtomicUsize,
    fail: AtomicBool,
}

impl MockGrants {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            issued: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
        })
    }
}

#[async_trait::async_trait]
impl GrantProvider for MockGrants {
    async fn connection_details(
        &self,
        room_name: Option<&str>,
        participant_name: Option<&str>,
    ) -> Result<ConnectionDetails, SessionError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(SessionError::Grant("issuer offline".to_string()));
        }
        let serial = self.issued.fetch_add(1, Ordering::SeqCst);
        Ok(ConnectionDetails {
            server_url: "ws://rtc.test".to_string(),
            room_name: room_name.unwrap_or("ace-room").to_string(),
            participant_token: format!("token-{}", serial),
            participant_name: participant_name.unwrap_or("guest").to_string(),
        })
    }
}

struct MockRoom {
    state: Mutex<ConnectionState>,
    disconnects: AtomicUsize,
    events_tx: broadcast::Sender<RoomEvent>,
}

impl MockRoom {
    fn new() -> Arc<Self> {
        let (events_tx, _) = broadcast::channel(16);
        Arc::new(Self {
            state: Mutex::new(ConnectionState::Connected),
            disconnects: AtomicUsize::new(0),
            events_tx,
        })
    }

    /// Simulates the server side closing the connection.
    fn remote_disconnect(&self) {
        *self.state.lock().unwrap() = ConnectionState::Disconnected;
        let _ = self.events_tx.send(RoomEvent::Disconnected);
    }

    fn publish_track(&self, track: Arc<dyn AudioTrack>) {
        let _ = self.events_tx.send(RoomEvent::TrackPublished(track));
    }

    fn unpublish_track(&self) {
        let _ = self.events_tx.send(RoomEvent::TrackUnpublished);
    }
}

#[async_trait::async_trait]
impl RoomConnection for MockRoom {
    async fn disconnect(&self) {
        let mut state = self.state.lock().unwrap();
        if *state == ConnectionState::Connected {
            *state = ConnectionState::Disconnected;
            self.disconnects.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn state(&self) -> ConnectionState {
        *self.state.lock().unwrap()
    }

    fn events(&self) -> broadcast::Receiver<RoomEvent> {
        self.events_tx.subscribe()
    }
}

struct MockTransport {
    joins: AtomicUsize,
    join_gate: Option<Arc<Notify>>,
    rooms: Mutex<Vec<Arc<MockRoom>>>,
}

impl MockTransport {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            joins: AtomicUsize::new(0),
            join_gate: None,
            rooms: Mutex::new(Vec::new()),
        })
    }

    fn gated() -> (Arc<Self>, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        let transport = Arc::new(Self {
            joins: AtomicUsize::new(0),
            join_gate: Some(gate.clone()),
            rooms: Mutex::new(Vec::new()),
        });
        (transport, gate)
    }

    fn room(&self, index: usize) -> Arc<MockRoom> {
        self.rooms.lock().unwrap()[index].clone()
    }
}

#[async_trait::async_trait]
impl RoomTransport for MockTransport {
    async fn join(
        &self,
        _server_url: &str,
        _token: &str,
    ) -> Result<Arc<dyn RoomConnection>, SessionError> {
        self.joins.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.join_gate {
            gate.notified().await;
        }
        let room = MockRoom::new();
        self.rooms.lock().unwrap().push(room.clone());
        Ok(room)
    }
}

#[derive(Default)]
struct TrackData {
    live_graphs: AtomicUsize,
}

#[derive(Clone, Default)]
struct TestTrack {
    data: Arc<TrackData>,
}

impl AudioTrack for TestTrack {
    fn open_spectrum(&self, fft_size: usize) -> Result<Box<dyn SpectrumSource>, AnalysisError> {
        self.data.live_graphs.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(TestSource {
            data: self.data.clone(),
            bin_count: fft_size / 2,
            closed: false,
        }))
    }
}

struct TestSource {
    data: Arc<TrackData>,
    bin_count: usize,
    closed: bool,
}

impl SpectrumSource for TestSource {
    fn bin_count(&self) -> usize {
        self.bin_count
    }

    fn read_frequency_bins(&mut self, out: &mut [u8]) -> Result<(), AnalysisError> {
        out.fill(200);
        Ok(())
    }

    fn close(&mut self) -> Result<(), AnalysisError> {
        if !self.closed {
            self.closed = true;
            self.data.live_graphs.fetch_sub(1, Ordering::SeqCst);
        }
        Ok(())
    }
}

fn controller(
    grants: Arc<MockGrants>,
    transport: Arc<MockTransport>,
) -> Arc<SessionController> {
    SessionController::new(grants, transport, SessionIdentity::default())
}

#[tokio::test]
async fn exit_completion_closes_the_connection_only_after_the_animation() {
    let transport = MockTransport::new();
    let ctrl = controller(MockGrants::new(), transport.clone());

    ctrl.start_session().await.expect("start failed");
    let room = transport.room(0);
    assert!(ctrl.is_active());
    assert_eq!(room.state(), ConnectionState::Connected);

    // Exit begins: the flag flips, but the connection stays open until the
    // animation completes.
    ctrl.end_session();
    assert!(!ctrl.is_active());
    assert_eq!(room.state(), ConnectionState::Connected);
    assert_eq!(room.disconnects.load(Ordering::SeqCst), 0);

    ctrl.finish_exit().await;
    assert_eq!(room.state(), ConnectionState::Disconnected);
    assert_eq!(room.disconnects.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn stale_exit_completion_never_closes_a_reentered_session() {
    let transport = MockTransport::new();
    let grants = MockGrants::new();
    let ctrl = controller(grants.clone(), transport.clone());

    // start, end, start again, all before the first exit's completion
    // callback fires.
    ctrl.start_session().await.expect("start failed");
    ctrl.end_session();
    ctrl.start_session().await.expect("re-entry failed");

    // The stale completion from the first exit fires now. It must re-read
    // the flag and become a no-op.
    ctrl.finish_exit().await;

    let room = transport.room(0);
    assert!(ctrl.is_active());
    assert_eq!(room.state(), ConnectionState::Connected);
    assert_eq!(room.disconnects.load(Ordering::SeqCst), 0);
    // Re-entry during the fade-out reuses the open connection.
    assert_eq!(transport.joins.load(Ordering::SeqCst), 1);
    assert_eq!(grants.issued.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn ending_during_an_inflight_join_disconnects_cleanly() {
    let (transport, gate) = MockTransport::gated();
    let ctrl = controller(MockGrants::new(), transport.clone());

    let starter = {
        let ctrl = ctrl.clone();
        tokio::spawn(async move { ctrl.start_session().await })
    };

    // Let the join get in flight, then end the session before it resolves.
    sleep(Duration::from_millis(20)).await;
    assert_eq!(transport.joins.load(Ordering::SeqCst), 1);
    ctrl.end_session();
    gate.notify_one();

    timeout(WAIT, starter)
        .await
        .expect("join never resolved")
        .expect("start task panicked")
        .expect("start failed");

    // The resolved connection was not orphaned.
    let room = transport.room(0);
    assert_eq!(room.state(), ConnectionState::Disconnected);
    assert_eq!(room.disconnects.load(Ordering::SeqCst), 1);
    assert!(!ctrl.is_active());

    // The later completion callback has nothing left to close.
    ctrl.finish_exit().await;
    assert_eq!(room.disconnects.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn remote_disconnect_exits_without_a_second_close() {
    let transport = MockTransport::new();
    let ctrl = controller(MockGrants::new(), transport.clone());

    ctrl.start_session().await.expect("start failed");
    let room = transport.room(0);

    room.remote_disconnect();

    let mut phase = ctrl.phase_updates();
    timeout(WAIT, phase.wait_for(|p| *p == SessionPhase::Welcome))
        .await
        .expect("timed out waiting for exit")
        .expect("phase channel closed");
    assert!(!ctrl.is_active());

    // The animation completes; the connection is already down, so the
    // client never issues its own disconnect.
    ctrl.finish_exit().await;
    assert_eq!(room.disconnects.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn track_events_drive_the_analysis_pipeline() {
    let transport = MockTransport::new();
    let ctrl = controller(MockGrants::new(), transport.clone());

    ctrl.start_session().await.expect("start failed");
    let room = transport.room(0);
    let track = TestTrack::default();

    room.publish_track(Arc::new(track.clone()));
    let mut levels = ctrl.levels();
    timeout(WAIT, levels.wait_for(|l| l.low > 0.0))
        .await
        .expect("timed out waiting for levels")
        .expect("levels channel closed");

    room.unpublish_track();
    timeout(WAIT, levels.wait_for(|l| *l == BandLevels::ZERO))
        .await
        .expect("timed out waiting for reset")
        .expect("levels channel closed");
    assert_eq!(track.data.live_graphs.load(Ordering::SeqCst), 0);

    ctrl.end_session();
    ctrl.finish_exit().await;
}

#[tokio::test]
async fn grant_failure_returns_to_welcome() {
    let transport = MockTransport::new();
    let grants = MockGrants::new();
    grants.fail.store(true, Ordering::SeqCst);
    let ctrl = controller(grants, transport.clone());

    let result = ctrl.start_session().await;
    assert!(matches!(result, Err(SessionError::Grant(_))));
    assert!(!ctrl.is_active());
    assert_eq!(*ctrl.phase_updates().borrow(), SessionPhase::Welcome);
    assert_eq!(transport.joins.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn every_full_cycle_uses_a_fresh_grant() {
    let transport = MockTransport::new();
    let grants = MockGrants::new();
    let ctrl = controller(grants.clone(), transport.clone());

    ctrl.start_session().await.expect("first start failed");
    ctrl.end_session();
    ctrl.finish_exit().await;

    ctrl.start_session().await.expect("second start failed");
    ctrl.end_session();
    ctrl.finish_exit().await;

    assert_eq!(grants.issued.load(Ordering::SeqCst), 2);
    assert_eq!(transport.joins.load(Ordering::SeqCst), 2);
    assert_eq!(transport.room(0).disconnects.load(Ordering::SeqCst), 1);
    assert_eq!(transport.room(1).disconnects.load(Ordering::SeqCst), 1);
}
