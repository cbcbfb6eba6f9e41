pub mod application;
pub mod domain;

pub use application::{DataStatus, QuerySnapshot, StateStore};
pub use domain::{
    FilterAction, FilterChange, FilterType, Listener, ListenerId, StoreEvent, StoreEventKind,
    StoreEventPayload,
};
