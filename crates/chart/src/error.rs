use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("Pointer subscription {0} is not registered with this container")]
    UnknownSubscription(u32),

    #[error("Chart container is busy dispatching an event")]
    ContainerBusy,

    #[error("Chart is busy handling a pointer event")]
    ChartBusy,
}
