use crate::api::session::Session;
use crate::cli::main_types::{
    AuthCommands, Commands, ConfigCommands, ConnectionArgs, MetadataCommands, ViewCommands,
    WorkbookCommands,
};
use crate::core::services::config_service::ConfigService;
use crate::core::services::metadata_service::MetadataService;
use crate::core::services::types::ListParams;
use crate::core::services::view_service::ViewService;
use crate::core::services::workbook_service::WorkbookService;
use crate::display::TableDisplay;
use crate::error::{AppError, AuthError, CliError, ConfigError, StorageError, ValidationError};
use crate::storage::config::{Config, Profile};
use crate::storage::credentials::resolve_token_secret;
use crate::utils::text::mask_secret;
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;

pub struct Dispatcher {
    config: Config,
    config_path: Option<PathBuf>,
    profile_name: String,
    connection: ConnectionArgs,
    display: TableDisplay,
}

impl Dispatcher {
    pub fn new(
        config: Config,
        config_path: Option<PathBuf>,
        profile_name: String,
        connection: ConnectionArgs,
    ) -> Self {
        Self {
            config,
            config_path,
            profile_name,
            connection,
            display: TableDisplay::new(),
        }
    }

    pub async fn dispatch(self, command: Commands) -> Result<(), AppError> {
        match command {
            Commands::Auth { command } => self.handle_auth_command(command).await,
            Commands::Workbooks { command } => self.handle_workbook_command(command).await,
            Commands::Views { command } => self.handle_view_command(command).await,
            Commands::Metadata { command } => self.handle_metadata_command(command).await,
            Commands::Config { command } => self.handle_config_command(command),
        }
    }

    /// Stored profile with command-line overrides applied
    fn effective_profile(&self) -> Result<Profile, AppError> {
        let mut profile = self
            .config
            .get_profile(&self.profile_name)
            .cloned()
            .unwrap_or_default();

        if let Some(server) = &self.connection.server {
            profile.server_url = server.clone();
        }
        if let Some(name) = &self.connection.token_name {
            profile.token_name = Some(name.clone());
        }
        if let Some(site) = &self.connection.site {
            profile.site_id = Some(site.clone());
        }

        if profile.server_url.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "server_url".to_string(),
                hint: format!(
                    "Pass --server or run 'bleau config set --profile {} --server <url>'",
                    self.profile_name
                ),
            }
            .into());
        }
        Ok(profile)
    }

    /// Sign in with the effective profile; a rejected sign-in is an error here
    async fn open_session(&self) -> Result<Session, AppError> {
        let profile = self.effective_profile()?;
        let token_name = profile.token_name.clone().unwrap_or_default();
        if token_name.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "token_name".to_string(),
                hint: "Pass --token-name or run 'bleau config set --token-name <name>'"
                    .to_string(),
            }
            .into());
        }

        let secret = resolve_token_secret(self.connection.token_secret.clone(), &token_name)?;
        let mut session = Session::new(profile.session_config(&secret)?)?;

        log::debug!("Using profile '{}': {}", self.profile_name, session);
        if !session.authenticate().await? {
            return Err(AuthError::SignInRejected.into());
        }
        Ok(session)
    }

    async fn close_session(session: &mut Session) {
        if !session.sign_out().await {
            log::warn!("Sign-out was not confirmed by the server; the token will expire on its own");
        }
    }

    async fn handle_auth_command(&self, command: AuthCommands) -> Result<(), AppError> {
        match command {
            AuthCommands::Check => {
                let mut session = self.open_session().await?;
                println!("✅ Signed in to {}", session.server_url());
                println!(
                    "Site: {} ({})",
                    if session.site_id().is_empty() {
                        "(default)"
                    } else {
                        session.site_id()
                    },
                    session.site_uuid().unwrap_or("unknown")
                );
                if let Some(user) = session.user_id() {
                    println!("User: {}", user);
                }
                if let Some(token) = session.auth_token() {
                    println!("Token: {}", mask_secret(token));
                }
                Self::close_session(&mut session).await;
                println!("Signed out");
                Ok(())
            }
        }
    }

    async fn handle_workbook_command(&self, command: WorkbookCommands) -> Result<(), AppError> {
        let mut session = self.open_session().await?;
        let result = self.run_workbook_command(&session, command).await;
        Self::close_session(&mut session).await;
        result
    }

    async fn run_workbook_command(
        &self,
        session: &Session,
        command: WorkbookCommands,
    ) -> Result<(), AppError> {
        let service = WorkbookService::new(session)?;
        match command {
            WorkbookCommands::List {
                filter,
                sort,
                page_size,
                page_number,
                json,
            } => {
                let params = ListParams {
                    filter,
                    sort,
                    page_size,
                    page_number,
                    ..ListParams::default()
                };

                let page = service.list_page(&params).await?;
                if json {
                    println!("{}", to_pretty_json(&page.workbooks));
                } else {
                    println!("{}", self.display.render_workbook_list(&page.workbooks));
                    if let Some(summary) = page
                        .pagination
                        .as_ref()
                        .and_then(|p| self.display.render_pagination(p))
                    {
                        println!("{}", summary);
                    }
                }
                Ok(())
            }
            WorkbookCommands::Get { id, json } => {
                let workbook = service.get_workbook(&id).await?;
                if json {
                    println!("{}", to_pretty_json(&workbook));
                } else {
                    println!("{}", self.display.render_workbook_detail(&workbook));
                }
                Ok(())
            }
        }
    }

    async fn handle_view_command(&self, command: ViewCommands) -> Result<(), AppError> {
        let mut session = self.open_session().await?;
        let result = match command {
            ViewCommands::Data { id, limit } => match ViewService::new(&session) {
                Ok(service) => service.data(&id).await.map(|data| {
                    println!("{}", self.display.render_data_table(&data, Some(limit)));
                }),
                Err(e) => Err(e),
            },
        };
        Self::close_session(&mut session).await;
        result
    }

    async fn handle_metadata_command(&self, command: MetadataCommands) -> Result<(), AppError> {
        match command {
            MetadataCommands::Query { query, variables } => {
                // Parse inputs before signing in so bad input costs no round trip
                let query = read_query_argument(&query)?;
                let variables = variables.as_deref().map(parse_variables).transpose()?;

                let mut session = self.open_session().await?;
                let result = match MetadataService::new(&session) {
                    Ok(service) => service.query(&query, variables.as_ref()).await,
                    Err(e) => Err(e),
                };
                Self::close_session(&mut session).await;

                println!("{}", to_pretty_json(&result?));
                Ok(())
            }
        }
    }

    fn handle_config_command(&self, command: ConfigCommands) -> Result<(), AppError> {
        match command {
            ConfigCommands::Show => {
                let service = ConfigService::new(self.config.clone());
                println!(
                    "{}",
                    self.display.render_profiles(
                        &service.list_profiles(),
                        service.get_default_profile().map(String::as_str)
                    )
                );
                Ok(())
            }
            ConfigCommands::Set {
                api_version,
                timeout,
            } => {
                let timeout = timeout.map(|t| t.to_string());
                let updates = [
                    ("server", self.connection.server.as_deref()),
                    ("token-name", self.connection.token_name.as_deref()),
                    ("site", self.connection.site.as_deref()),
                    ("api-version", api_version.as_deref()),
                    ("timeout", timeout.as_deref()),
                ];
                if updates.iter().all(|(_, value)| value.is_none()) {
                    return Err(CliError::InvalidArguments(
                        "Nothing to set. Pass --server, --token-name, --site, --api-version or --timeout"
                            .to_string(),
                    )
                    .into());
                }

                let mut service = ConfigService::new(self.config.clone());
                for (field, value) in updates {
                    if let Some(value) = value {
                        service.set_profile_field(&self.profile_name, field, value)?;
                    }
                }
                service.save_config(self.config_path.clone())?;
                println!("✅ Profile '{}' updated", self.profile_name);
                Ok(())
            }
        }
    }
}

/// Query text, or the contents of a file when given as `@path`
fn read_query_argument(argument: &str) -> Result<String, AppError> {
    match argument.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path).map_err(|source| {
            StorageError::FileIo {
                path: path.to_string(),
                source,
            }
            .into()
        }),
        None => Ok(argument.to_string()),
    }
}

fn parse_variables(raw: &str) -> Result<Value, AppError> {
    let value: Value = serde_json::from_str(raw).map_err(|e| ValidationError::InvalidJson {
        field: "variables".to_string(),
        message: e.to_string(),
    })?;
    if !value.is_object() {
        return Err(ValidationError::InvalidJson {
            field: "variables".to_string(),
            message: "expected a JSON object".to_string(),
        }
        .into());
    }
    Ok(value)
}

fn to_pretty_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("<unprintable: {}>", e))
}
