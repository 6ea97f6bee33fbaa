use crate::command::parse_command;
use crate::config::{ServerConfig, route_path};
use crate::context::LockContext;
use crate::handlers::release_handler;
use crate::model::{
    Attachment, CommandArgs, CommandResponse, Post, PostAction, PostActionIntegration,
    PostActionIntegrationRequest, PostActionIntegrationResponse, PostProps, ResponseType,
};
use crate::{Error, Result};

use std::sync::Arc;

use arc_swap::ArcSwap;
use axum::Router;
use axum::http::StatusCode;
use axum::routing::post;
use chrono::Utc;
use simplelock_locks::{LockManager, Resource};
use simplelock_users::UserDirectory;
use tracing::{debug, error, info, warn};

/// Default plugin id, used in the callback route.
pub const PLUGIN_ID: &str = "net.bis5.mattermost.simplelock";

/// Label of the release control.
pub const RELEASE_ACTION_NAME: &str = "Release Lock";

/// Options for creating a new `SimpleLock`.
pub struct SimpleLockOptions<LM, UD>
where
    LM: LockManager,
    UD: UserDirectory,
{
    /// Lock manager shared by every command and callback.
    pub lock_manager: LM,

    /// Plugin id, part of the callback route.
    pub plugin_id: String,

    /// Initial host configuration.
    pub server_config: ServerConfig,

    /// Resolves user ids to display names.
    pub user_directory: UD,
}

/// Command and callback handling for the lock plugin.
///
/// Cheap to clone; clones share the lock manager and configuration.
#[derive(Clone)]
pub struct SimpleLock<LM, UD>
where
    LM: LockManager,
    UD: UserDirectory,
{
    lock_manager: LM,
    plugin_id: Arc<str>,
    server_config: Arc<ArcSwap<ServerConfig>>,
    user_directory: UD,
}

impl<LM, UD> SimpleLock<LM, UD>
where
    LM: LockManager,
    UD: UserDirectory,
{
    /// Creates a new `SimpleLock`.
    pub fn new(
        SimpleLockOptions {
            lock_manager,
            plugin_id,
            server_config,
            user_directory,
        }: SimpleLockOptions<LM, UD>,
    ) -> Self {
        Self {
            lock_manager,
            plugin_id: plugin_id.into(),
            server_config: Arc::new(ArcSwap::from_pointee(server_config)),
            user_directory,
        }
    }

    /// The plugin id.
    pub fn plugin_id(&self) -> &str {
        &self.plugin_id
    }

    /// The current host configuration.
    pub fn server_config(&self) -> Arc<ServerConfig> {
        self.server_config.load_full()
    }

    /// Replaces the host configuration. Release controls created from now
    /// on call back to the new site URL.
    pub fn on_configuration_change(&self, server_config: ServerConfig) {
        info!(site_url = %server_config.site_url, "server configuration changed");
        self.server_config.store(Arc::new(server_config));
    }

    /// Router serving the release callback.
    pub fn router(&self) -> Router {
        Router::new()
            .route(
                &route_path(&self.plugin_id),
                post(release_handler::<LM, UD>),
            )
            .fallback(|| async { StatusCode::NOT_FOUND })
            .with_state(self.clone())
    }

    /// Handles a `lock` command.
    ///
    /// A busy resource or a store failure produces an ephemeral notice,
    /// not an error.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArgument` for a malformed command line and
    /// `Error::UserLookup` if the caller cannot be resolved. In the latter
    /// case the lock taken for the call is released again.
    pub async fn execute_command(&self, args: CommandArgs) -> Result<CommandResponse> {
        let parsed = parse_command(&args.command)?;
        let resource = parsed.resource;

        match self.lock_manager.try_acquire(&resource).await {
            Ok(true) => {}
            Ok(false) => {
                debug!(%resource, user_id = %args.user_id, "lock rejected, already held");
                return Ok(CommandResponse::ephemeral(format!(
                    "Resource [{resource}] is already locked."
                )));
            }
            Err(e) => {
                error!(%resource, error = ?e, "failed to acquire lock");
                return Ok(CommandResponse::ephemeral(format!(
                    "Unable to lock resource [{resource}]. Please try again later."
                )));
            }
        }

        let user = match self.user_directory.get_user(&args.user_id).await {
            Ok(user) => user,
            Err(e) => {
                self.roll_back(&resource).await;
                return Err(Error::UserLookup(e.to_string()));
            }
        };

        info!(%resource, username = %user.username, "lock granted");

        let context = LockContext {
            resource: resource.to_string(),
            message: parsed.message,
            username: user.username,
        };

        Ok(self.lock_notice(&context, args.channel_id))
    }

    /// Handles an invoked release control.
    ///
    /// Any user may release. A resource that is not locked, or a store
    /// failure, produces an ephemeral notice and leaves the message alone.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArgument` if the context carries no valid
    /// resource.
    pub async fn handle_release(
        &self,
        request: PostActionIntegrationRequest,
    ) -> Result<PostActionIntegrationResponse> {
        let context = LockContext::from_map(&request.context)?;
        let resource = Resource::parse(context.resource.as_str())?;

        match self.lock_manager.release(&resource).await {
            Ok(true) => {
                info!(%resource, user_id = %request.user_id, "lock released");

                Ok(PostActionIntegrationResponse::update(Post {
                    message: context.released_notice(Utc::now()),
                    props: PostProps::default(),
                }))
            }
            Ok(false) => {
                debug!(%resource, user_id = %request.user_id, "release of unlocked resource");

                Ok(PostActionIntegrationResponse::ephemeral(format!(
                    "Resource [{resource}] did not locked."
                )))
            }
            Err(e) => {
                error!(%resource, error = ?e, "failed to release lock");

                Ok(PostActionIntegrationResponse::ephemeral(format!(
                    "Unable to release resource [{resource}]. Please try again later."
                )))
            }
        }
    }

    fn lock_notice(&self, context: &LockContext, channel_id: String) -> CommandResponse {
        let release_action = PostAction {
            name: RELEASE_ACTION_NAME.to_string(),
            integration: PostActionIntegration {
                url: self.server_config.load().release_url(&self.plugin_id),
                context: context.to_map(),
            },
        };

        CommandResponse {
            response_type: ResponseType::InChannel,
            text: context.notice(),
            username: Some(context.username.clone()),
            channel_id: Some(channel_id),
            attachments: vec![Attachment {
                pretext: context.notice(),
                text: String::new(),
                actions: vec![release_action],
            }],
        }
    }

    async fn roll_back(&self, resource: &Resource) {
        match self.lock_manager.release(resource).await {
            Ok(_) => warn!(%resource, "user lookup failed, lock rolled back"),
            Err(e) => error!(
                %resource,
                error = ?e,
                "user lookup failed and rolling back the lock failed, resource stays locked"
            ),
        }
    }
}
