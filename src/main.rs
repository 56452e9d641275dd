use live_clip_sender::sequencer::ThreadPause;
use live_clip_sender::{
    ClipRequest, RecordingTransport, SendResponse, SenderConfig, Session, Transport, UdpTransport,
};
use log::{error, info};
use std::io::{self, Read};
use std::process::ExitCode;

fn respond(response: &SendResponse) {
    println!("{}", response.to_json());
}

fn main() -> ExitCode {
    // stdout carries the JSON result, everything else goes to stderr
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let mut input = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut input) {
        error!("Could not read request: {}", e);
        respond(&SendResponse::failure(e.to_string()));
        return ExitCode::FAILURE;
    }
    info!("Received input: {} chars", input.len());

    let request = match ClipRequest::from_json(&input) {
        Ok(request) => request,
        Err(e) => {
            error!("Fatal error: {}", e);
            respond(&SendResponse::failure(e.to_string()));
            return ExitCode::FAILURE;
        }
    };

    let config = match SenderConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Fatal error: {}", e);
            respond(&SendResponse::failure(e.to_string()));
            return ExitCode::FAILURE;
        }
    };

    let transport: Box<dyn Transport> = if config.dry_run {
        info!("Dry run: commands are logged, not sent");
        Box::new(RecordingTransport::dry_run())
    } else {
        match UdpTransport::connect(&config.host, config.port) {
            Ok(transport) => {
                info!("Connecting to Ableton at {}", transport.destination());
                Box::new(transport)
            }
            Err(e) => {
                // Connection problems are reported in-band like any other send failure
                error!("Could not open connection to {}:{}: {}", config.host, config.port, e);
                respond(&SendResponse::failure(e.to_string()));
                return ExitCode::SUCCESS;
            }
        }
    };

    let mut session = Session::new(transport, ThreadPause, &config);
    let result = session.run(&request);
    respond(&SendResponse::from(&result));
    ExitCode::SUCCESS
}
