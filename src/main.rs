use anyhow::anyhow;
use donorlink::application_impl::*;
use donorlink::application_port::*;
use donorlink::domain_port::*;
use donorlink::infra::*;
use donorlink::logger::*;
use donorlink::settings::*;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let logger = Logger::new_bootstrap();

    let settings = parse_settings(cli.settings.as_deref())?;
    debug!(?settings);
    let logger_config = LogConfig {
        filter: settings.log.filter.clone(),
    };
    logger.reload_from_config(&logger_config)?;

    // A file store keeps its cookies on disk too, so cookie sessions outlive the process.
    let (store, cookies): (Arc<dyn CredentialStore>, Option<FileCookieJar>) =
        match settings.session.store.as_str() {
            "memory" => (Arc::new(MemoryCredentialStore::new()), None),
            "file" => (
                Arc::new(FileCredentialStore::open(&settings.session.store_path).await?),
                Some(FileCookieJar::open(&settings.session.cookie_path).await?),
            ),
            other => return Err(anyhow!("Unknown session store: {}", other)),
        };
    let transport: Arc<dyn HttpTransport> = match &cookies {
        Some(cookies) => Arc::new(ReqwestTransport::with_cookie_jar(cookies.jar())?),
        None => Arc::new(ReqwestTransport::new()?),
    };
    let navigator = LogNavigator::new();

    let client = GatewayClient::new(
        settings.gateway_config()?,
        transport,
        store,
        Arc::new(navigator.clone()),
    );

    let result = run(&client, cli.command).await;
    if let Some(cookies) = &cookies {
        if let Err(e) = cookies.save().await {
            error!("failed to save cookies to {}: {}", cookies.path().display(), e);
        }
    }
    if let Some(target) = navigator.last_redirect() {
        eprintln!("redirect: {}", target);
    }
    result
}

async fn run(client: &GatewayClient, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Get { path } => print_response(client.get(&path).await?),
        Command::Delete { path } => print_response(client.delete(&path).await?),
        Command::Post { path, body } => {
            print_response(client.post(&path, parse_body(body)?).await?)
        }
        Command::Put { path, body } => print_response(client.put(&path, parse_body(body)?).await?),
        Command::Patch { path, body } => {
            print_response(client.patch(&path, parse_body(body)?).await?)
        }
        Command::Login { email, password } => {
            let result = client.login(LoginInput { email, password }).await?;
            match result.user_id {
                Some(user_id) => println!("logged in as {} ({} mode)", user_id, result.mode.name()),
                None => println!("logged in ({} mode)", result.mode.name()),
            }
            Ok(())
        }
        Command::Logout => {
            client.logout().await?;
            println!("logged out");
            Ok(())
        }
        Command::Refresh => {
            let outcome = client.refresh().await?;
            println!("session refreshed ({} mode)", outcome.auth_mode().name());
            Ok(())
        }
        Command::Whoami => {
            let store = client.store();
            let mode = store.auth_mode().await?;
            let has_session = store.has_session_indicators().await?;
            match store.user_id().await? {
                Some(user_id) => println!("user {} ({} mode)", user_id, mode.name()),
                None if has_session => println!("anonymous session ({} mode)", mode.name()),
                None => println!("not logged in"),
            }
            Ok(())
        }
    }
}

fn parse_body(body: Option<String>) -> anyhow::Result<RequestBody> {
    match body {
        Some(body) => Ok(RequestBody::Json(serde_json::from_str(&body)?)),
        None => Ok(RequestBody::Empty),
    }
}

fn print_response(response: ApiResponse) -> anyhow::Result<()> {
    eprintln!("{}", response.status);
    match response.json::<serde_json::Value>() {
        Ok(value) => println!("{}", serde_json::to_string_pretty(&value)?),
        Err(_) => println!("{}", response.text()),
    }
    Ok(())
}
