mod render;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};
use tracing::{info, warn};

use campus_client::{
    ApiClient, ApiConfig, AuthHelper, ChatScreen, FileTokenStore, LoginOutcome, LoginScreen,
    ScreenHost, TokenStore,
};
use campus_types::models::UserInfo;

type Input = Lines<BufReader<Stdin>>;

/// Terminal stand-in for the browser: alerts go to stderr, logout flips a flag
/// the chat loop checks after every action.
#[derive(Default)]
struct TerminalHost {
    logged_out: AtomicBool,
}

impl TerminalHost {
    fn logged_out(&self) -> bool {
        self.logged_out.load(Ordering::SeqCst)
    }
}

impl ScreenHost for TerminalHost {
    fn alert(&self, message: &str) {
        eprintln!("! {}", message);
    }

    fn logout(&self) {
        self.logged_out.store(true, Ordering::SeqCst);
    }
}

enum ChatExit {
    Logout,
    Quit,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Init logging (stderr keeps the conversation on stdout clean)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "campus_chat=info,campus_client=info".into()),
        )
        .init();

    // Config (loads .env)
    let config = ApiConfig::from_env();
    if config.base_url.starts_with('/') {
        warn!(
            "CAMPUS_API_URL is unset; requests go to the relative path {:?} and will fail",
            config.base_url
        );
    }
    let store = FileTokenStore::from_env();
    info!("Session token file: {}", store.path().display());
    let store: Arc<dyn TokenStore> = Arc::new(store);

    let client = ApiClient::new(config, store)?;
    let auth = AuthHelper::new(client.clone());
    let mut input = BufReader::new(tokio::io::stdin()).lines();

    println!("Öğrenci Asistanı");
    println!("Akademik yolculuğunuzda size yardımcı olmak için buradayım");

    loop {
        let Some(user) = login(&client, &mut input).await? else {
            break;
        };
        if !ensure_token(&auth, &mut input).await? {
            break;
        }
        match chat(&client, user, &mut input).await? {
            ChatExit::Logout => continue,
            ChatExit::Quit => break,
        }
    }

    Ok(())
}

/// Print `label` and read one line. `None` on end of input.
async fn prompt(input: &mut Input, label: &str) -> anyhow::Result<Option<String>> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(label.as_bytes()).await?;
    stdout.flush().await?;
    Ok(input.next_line().await?)
}

async fn login(client: &ApiClient, input: &mut Input) -> anyhow::Result<Option<UserInfo>> {
    let mut screen = LoginScreen::new(client.clone());

    loop {
        let Some(email) = prompt(input, "E-posta Adresi: ").await? else {
            return Ok(None);
        };
        let Some(school) = prompt(input, "Okul Adı: ").await? else {
            return Ok(None);
        };
        screen.email = email;
        screen.school_name = school;

        println!("Gönderiliyor...");
        match screen.submit().await {
            LoginOutcome::LoggedIn(user) => return Ok(Some(user)),
            LoginOutcome::Invalid(errors) => {
                for line in render::field_errors(&errors) {
                    println!("{}", line);
                }
            }
            LoginOutcome::Failed(e) => println!("Giriş başarısız: {}", e),
            LoginOutcome::Busy => {}
        }
    }
}

/// The assistant endpoint needs a bearer token; ask for credentials if none
/// is stored yet. Returns `false` on end of input.
async fn ensure_token(auth: &AuthHelper, input: &mut Input) -> anyhow::Result<bool> {
    while auth.token().is_none() {
        let Some(username) = prompt(input, "Kullanıcı adı: ").await? else {
            return Ok(false);
        };
        let Some(password) = prompt(input, "Parola: ").await? else {
            return Ok(false);
        };
        if let Err(e) = auth.login(username.trim(), &password).await {
            println!("Oturum açılamadı: {}", e);
        }
    }
    Ok(true)
}

async fn chat(client: &ApiClient, user: UserInfo, input: &mut Input) -> anyhow::Result<ChatExit> {
    let host = Arc::new(TerminalHost::default());
    let screen = ChatScreen::new(client.clone(), host.clone(), Some(user.clone()));

    println!();
    println!("AI Öğrenci Asistanı | {} | {}", user.school_name, user.email);
    println!("(/logout çıkış yapar, /quit kapatır)");

    if !screen.mount() {
        return Ok(ChatExit::Logout);
    }

    let mut shown = 0;
    loop {
        let messages = screen.messages();
        for message in &messages[shown..] {
            println!("{}", render::message(message));
        }
        shown = messages.len();

        if host.logged_out() {
            return Ok(ChatExit::Logout);
        }

        let Some(line) = prompt(input, "> ").await? else {
            return Ok(ChatExit::Quit);
        };
        match line.trim() {
            "/quit" => return Ok(ChatExit::Quit),
            "/logout" => {
                screen.logout();
                return Ok(ChatExit::Logout);
            }
            _ => {}
        }

        screen.set_input(line);
        if screen.can_send() {
            println!("{}", render::TYPING);
        }
        screen.submit().await;
    }
}
