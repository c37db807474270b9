use std::cell::{Ref, RefCell};
use std::rc::{Rc, Weak};

use configuration::ChartSettings;
use core_types::HoverState;
use events::ChartEvent;

use crate::crosshair::{Crosshair, CrosshairState};
use crate::error::RenderError;
use crate::layout::Layout;
use crate::plot::{ChartModel, Plot};
use crate::surface::Surface;

pub type SubscriptionId = u32;

/// Pointer input delivered by the host container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Move { x: f64, y: f64 },
    Leave,
}

pub type PointerListener = Box<dyn FnMut(&PointerEvent)>;
pub type EventSink = Box<dyn FnMut(&ChartEvent)>;

/// The host element charts are mounted into. It owns the pointer listeners.
///
/// Listeners run while the container is mutably borrowed, so they must not
/// call back into it.
#[derive(Default)]
pub struct ChartContainer {
    next_id: SubscriptionId,
    listeners: Vec<(SubscriptionId, PointerListener)>,
}

impl ChartContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::new()))
    }

    pub fn subscribe(&mut self, listener: PointerListener) -> SubscriptionId {
        self.next_id += 1;
        self.listeners.push((self.next_id, listener));
        self.next_id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> Result<(), RenderError> {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        if self.listeners.len() == before {
            return Err(RenderError::UnknownSubscription(id));
        }
        Ok(())
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Delivers `event` to every listener; returns how many were notified.
    pub fn dispatch(&mut self, event: &PointerEvent) -> usize {
        for (_, listener) in self.listeners.iter_mut() {
            listener(event);
        }
        self.listeners.len()
    }

    /// Drops every listener, as a host does when it tears its element down.
    pub fn clear(&mut self) {
        self.listeners.clear();
    }
}

/// One chart instance: a model, its surface and its crosshair.
pub struct Chart<S: Surface> {
    model: ChartModel,
    layout: Layout,
    settings: ChartSettings,
    surface: S,
    crosshair: Crosshair,
    sink: Option<EventSink>,
}

impl<S: Surface> Chart<S> {
    pub fn new(model: impl Into<ChartModel>, settings: &ChartSettings, surface: S) -> Self {
        let model = model.into();
        Self {
            crosshair: Crosshair::new(model.baseline()),
            layout: Layout::from_settings(settings),
            settings: settings.clone(),
            model,
            surface,
            sink: None,
        }
    }

    /// Receives every event this chart publishes.
    pub fn on_event(mut self, sink: impl FnMut(&ChartEvent) + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    pub fn model(&self) -> &ChartModel {
        &self.model
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn hover_state(&self) -> HoverState {
        self.crosshair.hover_state()
    }

    pub fn crosshair(&self) -> CrosshairState {
        self.crosshair.state()
    }

    /// Draws the current frame, or the placeholder when there is no data.
    pub fn render(&mut self) {
        self.model.render(
            &mut self.surface,
            &self.layout,
            &self.settings,
            self.crosshair.bucket(),
        );
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) -> Option<ChartEvent> {
        let event = self.crosshair.pointer_move(&self.model, &self.layout, x, y);
        self.after_pointer(event)
    }

    pub fn pointer_leave(&mut self) -> Option<ChartEvent> {
        let event = self.crosshair.pointer_leave();
        self.after_pointer(event)
    }

    /// Swaps in a new model and starts over from an idle crosshair.
    fn reset(&mut self, model: ChartModel) {
        self.crosshair = Crosshair::new(model.baseline());
        self.model = model;
        self.show();
    }

    fn show(&mut self) {
        self.render();
        if self.model.is_empty() {
            tracing::info!(kind = ?self.model.kind(), "Chart has no data to plot.");
            let event = ChartEvent::EmptyState {
                kind: self.model.kind(),
                message: self.settings.empty_message.clone(),
            };
            self.publish(&event);
        }
    }

    fn handle(&mut self, event: &PointerEvent) {
        match *event {
            PointerEvent::Move { x, y } => self.pointer_move(x, y),
            PointerEvent::Leave => self.pointer_leave(),
        };
    }

    fn after_pointer(&mut self, event: Option<ChartEvent>) -> Option<ChartEvent> {
        let event = event?;
        self.render();
        self.publish(&event);
        Some(event)
    }

    fn publish(&mut self, event: &ChartEvent) {
        if let Some(sink) = self.sink.as_mut() {
            sink(event);
        }
    }
}

/// Ownership of a mounted chart and its pointer subscription.
///
/// Dropping the handle releases the subscription. Data changes go through
/// [`ChartHandle::replace`], which releases the old subscription before
/// registering a new one.
pub struct ChartHandle<S: Surface + 'static> {
    container: Rc<RefCell<ChartContainer>>,
    chart: Rc<RefCell<Chart<S>>>,
    subscription: Option<SubscriptionId>,
}

/// Mounts `chart` into `container`, draws its first frame and subscribes it to
/// pointer events.
pub fn attach<S: Surface + 'static>(
    container: &Rc<RefCell<ChartContainer>>,
    chart: Chart<S>,
) -> Result<ChartHandle<S>, RenderError> {
    let chart = Rc::new(RefCell::new(chart));
    let subscription = subscribe(container, &chart)?;
    chart.borrow_mut().show();
    tracing::debug!(subscription, "Chart attached.");
    Ok(ChartHandle {
        container: Rc::clone(container),
        chart,
        subscription: Some(subscription),
    })
}

fn subscribe<S: Surface + 'static>(
    container: &Rc<RefCell<ChartContainer>>,
    chart: &Rc<RefCell<Chart<S>>>,
) -> Result<SubscriptionId, RenderError> {
    let weak: Weak<RefCell<Chart<S>>> = Rc::downgrade(chart);
    let listener = move |event: &PointerEvent| {
        let Some(chart) = weak.upgrade() else {
            return;
        };
        match chart.try_borrow_mut() {
            Ok(mut chart) => chart.handle(event),
            Err(_) => tracing::warn!("Dropped pointer event for a chart that is already busy."),
        }
    };
    let mut container = container
        .try_borrow_mut()
        .map_err(|_| RenderError::ContainerBusy)?;
    Ok(container.subscribe(Box::new(listener)))
}

impl<S: Surface + 'static> ChartHandle<S> {
    /// Borrows the mounted chart.
    ///
    /// Panics if called from the chart's own event sink while it is handling a
    /// pointer event. Sinks should use [`ChartHandle::try_chart`] or read the
    /// values carried by the event instead.
    pub fn chart(&self) -> Ref<'_, Chart<S>> {
        self.chart.borrow()
    }

    pub fn try_chart(&self) -> Result<Ref<'_, Chart<S>>, RenderError> {
        self.chart.try_borrow().map_err(|_| RenderError::ChartBusy)
    }

    pub fn subscription(&self) -> Option<SubscriptionId> {
        self.subscription
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    /// Same borrowing rule as [`ChartHandle::chart`].
    pub fn hover_state(&self) -> HoverState {
        self.chart.borrow().hover_state()
    }

    pub fn try_hover_state(&self) -> Result<HoverState, RenderError> {
        Ok(self.try_chart()?.hover_state())
    }

    /// Releases the pointer subscription. Safe to call more than once.
    ///
    /// A subscription the container no longer knows about (because the host
    /// already cleared it) is logged and forgotten.
    pub fn dispose(&mut self) {
        match self.release() {
            Ok(()) => {}
            Err(RenderError::ContainerBusy) => {
                tracing::warn!("Chart container busy; subscription release deferred.");
            }
            Err(e) => tracing::debug!(error = %e, "Ignoring stale chart subscription."),
        }
    }

    /// Replaces the plotted data. The old subscription is released first, then
    /// the chart is redrawn from an idle crosshair and subscribed again.
    pub fn replace(&mut self, model: impl Into<ChartModel>) -> Result<(), RenderError> {
        match self.release() {
            Err(RenderError::ContainerBusy) => return Err(RenderError::ContainerBusy),
            Err(e) => tracing::debug!(error = %e, "Ignoring stale chart subscription."),
            Ok(()) => {}
        }
        self.chart.borrow_mut().reset(model.into());
        self.subscription = Some(subscribe(&self.container, &self.chart)?);
        Ok(())
    }

    fn release(&mut self) -> Result<(), RenderError> {
        let Some(id) = self.subscription.take() else {
            return Ok(());
        };
        let Ok(mut container) = self.container.try_borrow_mut() else {
            self.subscription = Some(id);
            return Err(RenderError::ContainerBusy);
        };
        container.unsubscribe(id)?;
        tracing::debug!(subscription = id, "Chart subscription released.");
        Ok(())
    }
}

impl<S: Surface + 'static> Drop for ChartHandle<S> {
    fn drop(&mut self) {
        self.dispose();
    }
}
