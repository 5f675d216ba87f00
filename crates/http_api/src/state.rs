use costbot_app::AppState;

use crate::connector::ConnectorClient;

#[derive(Clone)]
pub struct HttpState {
    pub app: AppState,
    pub connector: ConnectorClient,
}

impl HttpState {
    pub fn new(app: AppState, connector: ConnectorClient) -> Self {
        Self { app, connector }
    }
}
