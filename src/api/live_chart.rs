use std::time::Instant;

use chrono::Utc;
use tracing::{debug, trace};

use crate::core::{ChartLayout, MetricSeries, Viewport, compute_layout};
use crate::error::{VizError, VizResult};
use crate::interaction::{ChartId, PointerPosition, TooltipService};
use crate::refresh::{
    CompletionOutcome, FadeCoordinator, FetchTicket, RefreshScheduler, RefreshState,
    SchedulerPhase,
};
use crate::render::{BarFrameState, BarTransition, Renderer, Theme, build_bar_frame};

use super::LiveChartConfig;

/// Summary of one render pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderReport {
    pub bars_drawn: usize,
    /// Eased transition progress used for this pass.
    pub progress: f64,
    pub opacity: f64,
    /// `true` while the bar transition has not finished.
    pub animating: bool,
}

/// One live-updating bar chart.
///
/// Owns its refresh lifecycle, fade state and transition; borrows the page's
/// tooltip through `T`. All methods take the host's current instant, so the
/// chart can be driven by any event loop (or by a test) deterministically.
///
/// Control flow per refresh: [`on_timer`](Self::on_timer) hands out a
/// ticket, the host performs the fetch, [`complete_fetch`](Self::complete_fetch)
/// applies it, and [`render`](Self::render) redraws from a freshly computed
/// layout.
pub struct LiveBarChart<R: Renderer, T: TooltipService> {
    id: ChartId,
    config: LiveChartConfig,
    renderer: R,
    tooltip: T,
    scheduler: RefreshScheduler<MetricSeries>,
    fade: FadeCoordinator,
    theme: Theme,
    container_width: u32,
    transition: Option<BarTransition>,
    hovered: Option<usize>,
}

impl<R: Renderer, T: TooltipService> LiveBarChart<R, T> {
    pub fn new(
        renderer: R,
        tooltip: T,
        config: LiveChartConfig,
        container_width: u32,
    ) -> VizResult<Self> {
        config.validate()?;
        Viewport::new(container_width, config.height_px).ensure_valid()?;
        let scheduler = RefreshScheduler::new(config.refresh_interval(), config.overlap_policy)?;
        let fade = FadeCoordinator::new(config.fade_config())?;

        Ok(Self {
            id: ChartId::next(),
            config,
            renderer,
            tooltip,
            scheduler,
            fade,
            theme: Theme::default(),
            container_width,
            transition: None,
            hovered: None,
        })
    }

    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    #[must_use]
    pub fn id(&self) -> ChartId {
        self.id
    }

    #[must_use]
    pub fn config(&self) -> &LiveChartConfig {
        &self.config
    }

    #[must_use]
    pub fn theme(&self) -> Theme {
        self.theme
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.container_width, self.config.height_px)
    }

    #[must_use]
    pub fn refresh_state(&self) -> &RefreshState<MetricSeries> {
        self.scheduler.state()
    }

    #[must_use]
    pub fn scheduler_phase(&self) -> SchedulerPhase {
        self.scheduler.phase()
    }

    #[must_use]
    pub fn is_torn_down(&self) -> bool {
        self.scheduler.is_torn_down()
    }

    /// Series currently on screen; survives failed refreshes.
    #[must_use]
    pub fn displayed_series(&self) -> Option<&MetricSeries> {
        self.scheduler.displayed().map(|settled| &settled.data)
    }

    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.scheduler.in_flight()
    }

    #[must_use]
    pub fn opacity(&self) -> f64 {
        self.fade.opacity()
    }

    #[must_use]
    pub fn is_dimmed(&self) -> bool {
        self.fade.is_dimmed()
    }

    #[must_use]
    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    #[must_use]
    pub fn tooltip(&self) -> &T {
        &self.tooltip
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Starts polling and returns the ticket of the initial fetch.
    pub fn mount(&mut self, now: Instant) -> VizResult<FetchTicket> {
        let ticket = self.scheduler.start(now)?;
        self.fade.begin_refresh();
        debug!(chart = %self.id, seq = ticket.seq(), "chart mounted");
        Ok(ticket)
    }

    /// Timer callback: returns a ticket when a refresh is due.
    pub fn on_timer(&mut self, now: Instant) -> Option<FetchTicket> {
        self.fade.poll(now);
        let ticket = self.scheduler.poll(now)?;
        self.fade.begin_refresh();
        Some(ticket)
    }

    /// Reports the outcome of the fetch issued for `ticket`.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: VizResult<MetricSeries>,
        now: Instant,
    ) -> CompletionOutcome {
        let outcome = self.scheduler.complete(ticket, result, Utc::now());
        if outcome.finished_outstanding() {
            self.fade.finish_refresh(now);
        }
        if outcome == CompletionOutcome::Applied {
            self.release_hover();
            self.restart_transition(now);
        }
        debug!(chart = %self.id, seq = ticket.seq(), ?outcome, "fetch completed");
        outcome
    }

    /// Runs `fetch` synchronously for `ticket` and applies its result.
    pub fn run_fetch<F>(&mut self, ticket: FetchTicket, now: Instant, fetch: F) -> CompletionOutcome
    where
        F: FnOnce() -> VizResult<MetricSeries>,
    {
        let result = fetch();
        self.complete_fetch(ticket, result, now)
    }

    /// Gives up on the fetch issued for `ticket` without a result; the fade
    /// counts it as finished. Returns `false` for unknown tickets.
    pub fn abandon_fetch(&mut self, ticket: FetchTicket, now: Instant) -> bool {
        let abandoned = self.scheduler.abandon(ticket);
        if abandoned {
            self.fade.finish_refresh(now);
        }
        abandoned
    }

    /// Earliest instant at which the host should call back into the chart:
    /// next refresh, end of the fade hold, or end of the running transition.
    #[must_use]
    pub fn next_deadline(&self, now: Instant) -> Option<Instant> {
        let transition_end = self
            .transition
            .filter(|transition| !transition.is_finished(now))
            .map(BarTransition::ends_at);
        [self.scheduler.next_due(), self.fade.deadline(), transition_end]
            .into_iter()
            .flatten()
            .min()
    }

    /// Container was resized. The next render recomputes the layout.
    pub fn resize(&mut self, container_width: u32) -> VizResult<()> {
        Viewport::new(container_width, self.config.height_px).ensure_valid()?;
        if container_width != self.container_width {
            self.container_width = container_width;
            self.release_hover();
        }
        Ok(())
    }

    /// Switches the palette; a theme change redraws with a fresh transition.
    pub fn set_theme(&mut self, theme: Theme, now: Instant) {
        if theme != self.theme {
            self.theme = theme;
            self.restart_transition(now);
        }
    }

    /// Computes the layout for the current data and container size.
    pub fn layout(&self) -> VizResult<Option<ChartLayout>> {
        match self.displayed_series() {
            Some(series) => compute_layout(series, self.viewport(), &self.config.layout_options()),
            None => Ok(None),
        }
    }

    /// Pointer moved over the chart. Returns the hovered bar, if any.
    pub fn pointer_move(&mut self, pointer: PointerPosition) -> VizResult<Option<usize>> {
        if self.is_torn_down() {
            return Ok(None);
        }
        let layout = self.layout()?;
        let hit = layout
            .as_ref()
            .and_then(|layout| layout.bar_at(pointer.x, pointer.y));

        match (self.hovered, hit) {
            (Some(current), Some(index)) if current == index => {
                self.tooltip
                    .pointer_move(self.id, pointer.page_x, pointer.page_y);
            }
            (_, Some(index)) => {
                let text = self
                    .displayed_series()
                    .and_then(|series| series.get(index))
                    .map(|point| self.config.tooltip_text(&point))
                    .unwrap_or_default();
                trace!(chart = %self.id, index, "bar hover enter");
                self.hovered = Some(index);
                self.tooltip
                    .pointer_enter(self.id, text, pointer.page_x, pointer.page_y);
            }
            (Some(_), None) => self.pointer_leave(),
            (None, None) => {}
        }
        Ok(self.hovered)
    }

    /// Pointer left the hovered bar or the chart.
    pub fn pointer_leave(&mut self) {
        if self.hovered.take().is_some() {
            trace!(chart = %self.id, "bar hover leave");
            self.tooltip.pointer_leave(self.id);
        }
    }

    /// Draws the chart as of `now`. Every pass rebuilds the whole frame.
    pub fn render(&mut self, now: Instant) -> VizResult<RenderReport> {
        if self.is_torn_down() {
            return Err(VizError::InvalidState(
                "cannot render a torn-down chart".to_owned(),
            ));
        }
        self.fade.poll(now);

        let layout = self.layout()?;
        let progress = self
            .transition
            .map_or(1.0, |transition| transition.progress(now));
        let opacity = self.fade.opacity();
        let placeholder = match (self.displayed_series(), self.scheduler.state()) {
            (None, RefreshState::Failed(_)) => Some(self.config.empty_message.as_str()),
            _ => None,
        };

        let frame = build_bar_frame(
            self.viewport(),
            layout.as_ref(),
            &self.config.frame_style(self.theme),
            BarFrameState {
                progress,
                opacity,
                hovered: self.hovered,
            },
            placeholder,
        );
        self.renderer.render(&frame)?;

        Ok(RenderReport {
            bars_drawn: frame.rects.len(),
            progress,
            opacity,
            animating: self
                .transition
                .is_some_and(|transition| !transition.is_finished(now)),
        })
    }

    /// Stops polling. Outstanding fetches complete as no-ops afterwards.
    pub fn teardown(&mut self) {
        self.scheduler.teardown();
        self.fade.reset();
        self.transition = None;
        self.hovered = None;
        self.tooltip.release(self.id);
        debug!(chart = %self.id, "chart torn down");
    }

    fn restart_transition(&mut self, now: Instant) {
        self.transition = Some(BarTransition::start(
            now,
            self.config.transition_duration(),
            self.config.easing,
        ));
    }

    fn release_hover(&mut self) {
        self.hovered = None;
        self.tooltip.release(self.id);
    }
}
