// viewsmith-core/src/infrastructure/adapters/mod.rs

pub mod athena;
pub mod glue;
pub mod polling;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::Credentials;
use aws_credential_types::provider::SharedCredentialsProvider;
use tracing::{debug, instrument};

use crate::domain::deployment::{ConnectionConfig, EngineClass};
use crate::error::ViewsmithError;
use crate::ports::connector::{ConnectorFactory, EngineSession};

pub use athena::AthenaConnector;
pub use glue::GlueCatalog;
pub use polling::PollPolicy;

/// Builds AWS-backed sessions. Credentials come from the config when both keys are present,
/// otherwise from the default provider chain.
#[derive(Debug, Clone, Default)]
pub struct AwsConnectorFactory {
    poll: PollPolicy,
}

impl AwsConnectorFactory {
    pub fn new(poll: PollPolicy) -> Self {
        Self { poll }
    }

    async fn sdk_config(connection: &ConnectionConfig) -> SdkConfig {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(connection.aws_region.trim().to_string()));

        if let Some((access_key, secret_key)) = connection.static_credentials() {
            let credentials = Credentials::new(access_key, secret_key, None, None, "viewsmith-config");
            loader = loader.credentials_provider(SharedCredentialsProvider::new(credentials));
        } else {
            debug!("No static credentials in config, using the default provider chain");
        }

        loader.load().await
    }
}

#[async_trait]
impl ConnectorFactory for AwsConnectorFactory {
    #[instrument(skip(self, connection), fields(region = %connection.aws_region))]
    async fn connect(
        &self,
        class: EngineClass,
        connection: &ConnectionConfig,
    ) -> Result<EngineSession, ViewsmithError> {
        match class {
            EngineClass::Athena => {
                let sdk_config = Self::sdk_config(connection).await;
                Ok(EngineSession {
                    connector: Box::new(AthenaConnector::new(&sdk_config, connection, self.poll)),
                    catalog: Box::new(GlueCatalog::new(&sdk_config, connection)),
                })
            }
        }
    }
}
