use crate::Bridge;

pub struct AppState {
    pub bridge: Bridge,
}
