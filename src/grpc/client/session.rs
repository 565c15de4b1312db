use super::{map_status, GrpcClient};
use crate::driver::SessionOptions;
use crate::error::DcPowerError;
use crate::grpc::proto::{InitializeWithIndependentChannelsRequest, Session, SessionRequest};
use crate::types::SessionHandle;
use log::{debug, info};

impl GrpcClient {
    /// Open a session on one or more SMU resources.
    ///
    /// Corresponds to `InitializeWithIndependentChannels`. Resource names
    /// may list several instruments and channel ranges, for example
    /// `"PXI1Slot2/0, PXI1Slot3/0-1"`.
    ///
    /// # Errors
    /// Returns `DcPowerError::Driver` if the server cannot open the
    /// resources, or `DcPowerError::Type` if the reply carries no session.
    pub fn initialize_with_independent_channels(
        &mut self,
        resource_name: &str,
        option_string: &str,
        options: &SessionOptions,
    ) -> Result<SessionHandle, DcPowerError> {
        debug!(
            "Initializing session '{}' on '{resource_name}' (options: '{option_string}')",
            options.session_name
        );

        let request = InitializeWithIndependentChannelsRequest {
            session_name: options.session_name.clone(),
            resource_name: resource_name.to_string(),
            reset: false,
            option_string: option_string.to_string(),
            initialization_behavior: options.initialization_behavior as i32,
        };

        let reply = self
            .runtime
            .block_on(self.service.initialize_with_independent_channels(request))
            .map_err(map_status)?;

        if reply.status < 0 {
            let message = if reply.error_message.is_empty() {
                format!("driver status {}", reply.status)
            } else {
                reply.error_message
            };
            return Err(DcPowerError::Driver {
                code: reply.status,
                message,
            });
        }

        let session = reply
            .vi
            .map(|vi| SessionHandle::new(vi.name))
            .ok_or_else(|| DcPowerError::Type("Initialize reply carried no session".to_string()))?;

        info!(
            "Opened session '{}' ({})",
            session.name(),
            if reply.new_session_initialized {
                "new"
            } else {
                "attached"
            }
        );
        Ok(session)
    }

    /// Close a session and release its resources on the server
    pub fn close(&mut self, session: &SessionHandle) -> Result<(), DcPowerError> {
        let request = SessionRequest {
            vi: Session::named(session.name()),
        };
        let reply = self
            .runtime
            .block_on(self.service.close(request))
            .map_err(map_status)?;
        // the session is gone, so no error text can be looked up for it
        self.check_status(None, reply.status, "Close")?;
        debug!("Closed session '{}'", session.name());
        Ok(())
    }
}
