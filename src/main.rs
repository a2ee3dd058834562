//! The `parley` binary: a line-oriented chat prompt over a blocking HTTP
//! client.
//!
//! Everything conversational lives in the library; this file only reads
//! lines, dispatches parsed commands, performs the one network exchange per
//! send, and prints.

use std::{
    env, fs,
    io::{self, Write},
    process,
    time::Duration,
};

use serde::Deserialize;
use tracing::debug;

use parley::{
    Api,
    command::{self, Command},
    openai::{self, Role},
    session::Session,
};

/// Optional configuration file, looked up in the working directory.
const CONFIG_FILE: &str = "parley.toml";

/// How long a single completion request may take before it is aborted.
///
/// The exchange is synchronous, so without a timeout a stalled server would
/// hang the prompt forever.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(90);

/// Startup configuration, all fields optional in the file.
#[derive(Debug, Deserialize)]
#[serde(default)]
struct Config {
    /// Endpoint URL requests are sent to.
    url: String,
    /// Model identifier.
    model: String,
    /// Sampling temperature.
    temperature: f64,
    /// File the bearer token is read from.
    apikey_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: openai::DEFAULT_ENDPOINT.to_owned(),
            model: openai::DEFAULT_MODEL.to_owned(),
            temperature: openai::DEFAULT_TEMPERATURE,
            apikey_file: ".apikey".to_owned(),
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let config = load_config();

    // The credential is the one thing we cannot proceed without.
    let api_key = match fs::read_to_string(&config.apikey_file) {
        Ok(key) => key,
        Err(_) => {
            eprintln!(
                "No API key found. Please create a file named {} and paste your API key in it.",
                config.apikey_file
            );
            process::exit(1);
        }
    };

    // A trailing newline is not part of the token and would be rejected as a
    // header value.
    let api = Api::new(api_key.trim_end())
        .endpoint(config.url)
        .default_model(config.model)
        .default_temperature(config.temperature);

    let client = match reqwest::blocking::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
    {
        Ok(client) => client,
        Err(err) => {
            eprintln!("failed to set up HTTP client: {err}");
            process::exit(1);
        }
    };

    let mut session = Session::new();

    println!("Welcome to parley. Type !help to list commands.");

    // Startup arguments become a single input line, run before the loop.
    let args: Vec<String> = env::args().skip(1).collect();
    if !args.is_empty() && !run_line(&args.join(" "), &client, &api, &mut session) {
        return;
    }

    loop {
        print!(">>> ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        match io::stdin().read_line(&mut line) {
            Ok(0) => {
                // EOF ends the session like !exit.
                println!();
                break;
            }
            Ok(_) => {}
            Err(err) => {
                eprintln!("Error: {err}");
                break;
            }
        }

        if !run_line(&line, &client, &api, &mut session) {
            break;
        }
    }
}

/// Loads `parley.toml` from the working directory, falling back to defaults
/// if it does not exist.
fn load_config() -> Config {
    let raw = match fs::read_to_string(CONFIG_FILE) {
        Ok(raw) => raw,
        Err(_) => return Config::default(),
    };

    match toml::from_str(&raw) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("failed to parse {CONFIG_FILE}: {err}");
            process::exit(1);
        }
    }
}

/// Executes one input line. Returns `false` when the loop should exit.
fn run_line(
    line: &str,
    client: &reqwest::blocking::Client,
    api: &Api,
    session: &mut Session,
) -> bool {
    match command::parse(line) {
        Command::Empty => {}
        Command::Exit => return false,
        Command::Help => print_help(),
        Command::Reset => session.reset(),
        Command::Debug => {
            for (index, message) in session.history().iter().enumerate() {
                println!("[{index}] {}: {}", message.role, message.content);
            }
        }
        Command::Append(role, text) => session.append(role, text),
        Command::Unknown(line) => {
            eprintln!("unknown command: {line} (type !help for a list)");
        }
        Command::Send(text) => send(client, api, session, &text),
    }

    true
}

/// Sends the history, extended by one user turn if `text` is non-empty, for
/// completion.
///
/// Every failure is printed and the prompt continues; only a 200 response
/// with at least one choice appends a turn.
fn send(client: &reqwest::blocking::Client, api: &Api, session: &mut Session, text: &str) {
    if !text.is_empty() {
        session.append(Role::User, text);
    }

    let http_request = session.request(api);
    debug!(
        url = %http_request.url,
        bytes = http_request.body.len(),
        turns = session.history().len(),
        "sending completion request"
    );

    let request = match http_request.try_into_reqwest_blocking() {
        Ok(request) => request,
        Err(err) => {
            eprintln!("Error: {err}");
            return;
        }
    };

    let response = match client.execute(request) {
        Ok(response) => response,
        Err(err) => {
            eprintln!("Error: {err}");
            return;
        }
    };

    let status = response.status();
    let body = match response.text() {
        Ok(body) => body,
        Err(err) => {
            eprintln!("Error: {err}");
            return;
        }
    };
    debug!(%status, bytes = body.len(), "received completion response");

    if status != reqwest::StatusCode::OK {
        println!("Error: {body}");
        return;
    }

    match session.handle_response(&body) {
        Ok(reply) => println!("{reply}"),
        Err(err) => eprintln!("Error: {err}"),
    }
}

fn print_help() {
    println!("Commands:");
    println!("  <message>         send a message as the user");
    println!("  !user <message>   add a message as the user");
    println!("  !bot <message>    add a message as the bot");
    println!("  !sys <message>    add a message as the system");
    println!("  !reset            reset the conversation history");
    println!("  !debug            print the conversation history");
    println!("  !exit             exit the program");
    println!("  !help             show this help message");
}
