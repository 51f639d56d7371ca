use std::net::{Ipv4Addr, SocketAddr};

use anyhow::Result;
use tokio::net::TcpListener;
use tracing::info;

use crate::connector::server;

use super::super::Container;

pub struct ServeController<'a> {
    container: &'a Container,
}

impl<'a> ServeController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn serve(&self, port: u16, public: bool) -> Result<String> {
        let state = self.container.app_state()?;

        let host = if public {
            Ipv4Addr::UNSPECIFIED
        } else {
            Ipv4Addr::LOCALHOST
        };
        let listener = TcpListener::bind(SocketAddr::from((host, port))).await?;
        if !self.container.memory_storage() {
            info!("Chat history stored under {}", self.container.data_dir());
        }

        server::serve(listener, state).await?;
        Ok("Server stopped.".to_string())
    }
}
