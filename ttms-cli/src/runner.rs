use crate::commands::Command;
use crate::cookies::FileCookieJar;
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs::create_dir_all;
use ttms_common::store::file::JsonFileStore;
use ttms_http_client::reqwest::ReqwestClient;
use ttms_session::api::{DataApi, StudentQuery, SubjectStudentsQuery};
use ttms_session::config::{Config, FileStore};
use ttms_session::{NavigationGuard, SessionControllerBuilder, SessionRecord};

type Guard = NavigationGuard<JsonFileStore, FileCookieJar, ReqwestClient>;

pub struct Runner {
    guard: Guard,
    debug: bool,
}

impl Runner {
    pub async fn new(
        state_dir: Option<PathBuf>,
        validation_endpoint: Option<String>,
        data_endpoint: Option<String>,
        debug: bool,
    ) -> Result<Self> {
        let dir = match state_dir {
            Some(dir) => dir,
            None => dirs::config_dir()
                .with_context(|| format!("No config dir: {:?}", dirs::config_dir()))?
                .join("ttms-cli"),
        };
        create_dir_all(&dir).await?;

        let config_path = dir.join("config.json");
        let mut config = Config::load(&FileStore::new(&config_path))
            .await
            .with_context(|| format!("Invalid config file: {config_path:?}"))?;
        if let Some(endpoint) = validation_endpoint {
            config.validation_endpoint = endpoint;
        }
        if let Some(endpoint) = data_endpoint {
            config.data_endpoint = endpoint;
        }
        tracing::debug!(?config, "loaded config");

        let routes = config.route_table();
        let controller = SessionControllerBuilder::new(ReqwestClient::new())
            .config(config)
            .store(JsonFileStore::new(dir.join("storage.json")))
            .cookies(FileCookieJar::new(dir.join("cookies.json")))
            .build()
            .with_context(|| format!("Invalid config file: {config_path:?}"))?;
        Ok(Self { guard: NavigationGuard::new(Arc::new(controller), routes), debug })
    }
    pub async fn run(&self, command: Command) -> Result<()> {
        let controller = self.guard.controller();
        match command {
            Command::Login(args) => {
                let record = match (args.session_id, args.record) {
                    (_, Some(record)) => serde_json::from_str::<SessionRecord>(&record)
                        .with_context(|| "Invalid session record")?,
                    (session_id, None) => {
                        SessionRecord::new(session_id.with_context(|| "Missing session id")?)
                    }
                };
                controller.login(&record).await?;
                let validated = controller.get_current_validated().await;
                if validated.is_none() {
                    eprintln!("Session saved, but the server does not recognize it.");
                }
                self.print(&json!({ "saved": record, "validated": validated }))
            }
            Command::Logout => {
                controller.logout().await?;
                println!("Logged out.");
                Ok(())
            }
            Command::Status => {
                let session_id = controller.current_session_id().await;
                let validated = controller.validate(session_id.as_deref()).await;
                self.print(&json!({ "session_id": session_id, "validated": validated }))
            }
            Command::Navigate(args) => self.print(&self.guard.navigate(&args.path).await),
            Command::Curricula => self.print(&self.api().await?.curricula().await?),
            Command::Cohort(args) => self.print(&self.api().await?.cohort(&args.cohort).await?),
            Command::Students(args) => {
                let mut query = StudentQuery::new(args.term.sesi, args.term.semester)
                    .page(args.limit, args.offset);
                for (key, value) in args.filters {
                    query = query.filter(key, value);
                }
                self.print(&self.api().await?.students(&query).await?)
            }
            Command::Lecturers(args) => {
                let extra = args.params.into_iter().collect::<BTreeMap<_, _>>();
                self.print(
                    &self
                        .api()
                        .await?
                        .lecturers(&args.term.sesi, &args.term.semester, &extra)
                        .await?,
                )
            }
            Command::SubjectStudents(args) => self.print(
                &self
                    .api()
                    .await?
                    .subject_students(&SubjectStudentsQuery {
                        sesi: args.term.sesi,
                        semester: args.term.semester,
                        kod_subjek: args.kod_subjek,
                        seksyen: args.seksyen,
                    })
                    .await?,
            ),
        }
    }
    async fn api(&self) -> Result<DataApi<ReqwestClient>> {
        self.guard.controller().data_api().await.with_context(|| "Not logged in")
    }
    fn print<T: std::fmt::Debug + Serialize>(&self, result: &T) -> Result<()> {
        if self.debug {
            println!("{:#?}", result);
        } else {
            println!("{}", serde_json::to_string_pretty(result)?);
        }
        Ok(())
    }
}
