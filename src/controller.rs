//! # Display Controller
//!
//! Owns the canvas and drives three independent cadences:
//!
//! - **Render** (1s): draw the selected screen from its latest snapshot
//! - **Rotate** (30s): advance the selection while auto-rotate is on
//! - **Refresh** (60s): re-fetch all three snapshots, whatever is selected
//!
//! Render and rotate share one task, the only writer of the canvas. Refresh
//! runs on its own task so a slow upstream never delays a frame; each fetch is
//! bounded by the fetch timeout and its outcome is folded into the screen's
//! snapshot under that screen's [`FailurePolicy`]. If the refresh task dies it
//! is logged and restarted one refresh period later.
//!
//! Manual selections go straight to the [`DisplayHandle`] and show up on the
//! next render tick. They do not touch the rotation timer, so the next
//! rotation still fires on its existing phase.

use crate::canvas::Canvas;
use crate::panel::PanelError;
use crate::screens::{
    Departures, FailurePolicy, ScreenRenderer, Snapshot, StandingsScreen, TeamRecord,
    TransitScreen, WeatherReport, WeatherScreen,
};
use crate::sources::{DataSource, FetchError};
use crate::state::DisplayHandle;
use crate::Screen;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{self, Instant, MissedTickBehavior};

/// Timer periods for the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Schedule {
    pub render: Duration,
    pub rotate: Duration,
    pub refresh: Duration,
    pub fetch_timeout: Duration,
}

impl Default for Schedule {
    fn default() -> Self {
        Schedule {
            render: Duration::from_secs(1),
            rotate: Duration::from_secs(30),
            refresh: Duration::from_secs(60),
            fetch_timeout: Duration::from_secs(10),
        }
    }
}

/// Failure policy per screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Policies {
    pub weather: FailurePolicy,
    pub standings: FailurePolicy,
    pub transit: FailurePolicy,
}

impl Default for Policies {
    fn default() -> Self {
        Policies {
            weather: FailurePolicy::KeepStale,
            standings: FailurePolicy::KeepStale,
            transit: FailurePolicy::ShowError,
        }
    }
}

/// Latest snapshot of every screen.
///
/// Written only by the refresh task, read only while rendering. Each
/// snapshot is replaced whole under its write lock.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    weather: RwLock<Snapshot<WeatherReport>>,
    standings: RwLock<Snapshot<Vec<TeamRecord>>>,
    transit: RwLock<Snapshot<Departures>>,
}

fn read<T: Clone>(slot: &RwLock<Snapshot<T>>) -> Snapshot<T> {
    slot.read().unwrap_or_else(PoisonError::into_inner).clone()
}

impl SnapshotStore {
    pub fn weather(&self) -> Snapshot<WeatherReport> {
        read(&self.weather)
    }

    pub fn standings(&self) -> Snapshot<Vec<TeamRecord>> {
        read(&self.standings)
    }

    pub fn transit(&self) -> Snapshot<Departures> {
        read(&self.transit)
    }
}

/// The three screen renderers.
pub struct Screens {
    pub weather: WeatherScreen,
    pub standings: StandingsScreen,
    pub transit: TransitScreen,
}

impl Screens {
    /// Draw `screen` from a copy of its current snapshot and present it.
    fn render(&self, screen: Screen, store: &SnapshotStore, canvas: &mut Canvas) -> Result<(), PanelError> {
        match screen {
            Screen::Weather => self.weather.render(&store.weather(), canvas),
            Screen::Standings => self.standings.render(&store.standings(), canvas),
            Screen::Transit => self.transit.render(&store.transit(), canvas),
        }
    }
}

/// One data source per screen.
pub struct Sources<W, S, T> {
    pub weather: W,
    pub standings: S,
    pub transit: T,
}

impl<W, S, T> Sources<W, S, T>
where
    W: DataSource<Output = WeatherReport>,
    S: DataSource<Output = Vec<TeamRecord>>,
    T: DataSource<Output = Departures>,
{
    /// Fetch all three concurrently and fold the results into `store`.
    pub async fn refresh(&self, store: &SnapshotStore, policies: Policies, limit: Duration) {
        tokio::join!(
            refresh_one(&self.weather, &store.weather, policies.weather, limit),
            refresh_one(&self.standings, &store.standings, policies.standings, limit),
            refresh_one(&self.transit, &store.transit, policies.transit, limit),
        );
    }
}

async fn refresh_one<D: DataSource>(
    source: &D,
    slot: &RwLock<Snapshot<D::Output>>,
    policy: FailurePolicy,
    limit: Duration,
) {
    let result = time::timeout(limit, source.fetch())
        .await
        .unwrap_or(Err(FetchError::Timeout(limit)));

    match &result {
        Ok(_) => log::info!("{} data updated", source.name()),
        Err(err) => log::warn!("{} refresh failed ({:?}): {}", source.name(), policy, err),
    }

    slot.write()
        .unwrap_or_else(PoisonError::into_inner)
        .apply(result, policy);
}

async fn refresh_loop<W, S, T>(
    sources: Arc<Sources<W, S, T>>,
    store: Arc<SnapshotStore>,
    policies: Policies,
    schedule: Schedule,
    start: Instant,
) where
    W: DataSource<Output = WeatherReport>,
    S: DataSource<Output = Vec<TeamRecord>>,
    T: DataSource<Output = Departures>,
{
    let mut ticker = time::interval_at(start, schedule.refresh);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        sources.refresh(&store, policies, schedule.fetch_timeout).await;
    }
}

pub struct DisplayController<W, S, T> {
    canvas: Canvas,
    display: DisplayHandle,
    screens: Screens,
    sources: Sources<W, S, T>,
    store: Arc<SnapshotStore>,
    schedule: Schedule,
    policies: Policies,
}

impl<W, S, T> DisplayController<W, S, T>
where
    W: DataSource<Output = WeatherReport>,
    S: DataSource<Output = Vec<TeamRecord>>,
    T: DataSource<Output = Departures>,
{
    pub fn new(
        canvas: Canvas,
        display: DisplayHandle,
        screens: Screens,
        sources: Sources<W, S, T>,
        schedule: Schedule,
        policies: Policies,
    ) -> Self {
        Self {
            canvas,
            display,
            screens,
            sources,
            store: Arc::new(SnapshotStore::default()),
            schedule,
            policies,
        }
    }

    /// Handle on the snapshots, for inspection while the controller runs.
    pub fn store(&self) -> Arc<SnapshotStore> {
        Arc::clone(&self.store)
    }

    /// Run until `shutdown` flips to true (or its sender is dropped), then
    /// blank the panel.
    ///
    /// Only a panel I/O failure ends the loop early; it is returned as is.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) -> Result<(), PanelError> {
        let DisplayController {
            mut canvas,
            display,
            screens,
            sources,
            store,
            schedule,
            policies,
        } = self;

        let sources = Arc::new(sources);
        let spawn_refresher = |start: Instant| {
            tokio::spawn(refresh_loop(
                Arc::clone(&sources),
                Arc::clone(&store),
                policies,
                schedule,
                start,
            ))
        };
        let mut refresher = spawn_refresher(Instant::now());

        let mut render = time::interval(schedule.render);
        render.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut rotate = time::interval_at(Instant::now() + schedule.rotate, schedule.rotate);
        rotate.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let outcome = loop {
            if *shutdown.borrow_and_update() {
                break Ok(());
            }
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break Ok(());
                    }
                }
                joined = &mut refresher => {
                    match joined {
                        Err(err) => log::error!("Refresh task failed: {}; restarting", err),
                        Ok(()) => log::error!("Refresh task exited; restarting"),
                    }
                    refresher = spawn_refresher(Instant::now() + schedule.refresh);
                }
                _ = rotate.tick() => {
                    if let Some(screen) = display.rotate() {
                        log::info!("Auto-rotating to {}", screen);
                    }
                }
                _ = render.tick() => {
                    let selected = display.snapshot().selected;
                    if let Err(err) = screens.render(selected, &store, &mut canvas) {
                        break Err(err);
                    }
                }
            }
        };

        refresher.abort();
        outcome?;

        canvas.clear();
        canvas.show()?;
        log::info!("Display cleared, controller stopped");
        Ok(())
    }
}
