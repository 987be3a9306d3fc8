use clap::Parser;
use fortune_teller::utils::error::{ErrorSeverity, FortuneError};
use fortune_teller::utils::logger;
use fortune_teller::{
    build_service, BirthRecord, CliConfig, FortuneConfig, FortuneResponse,
    InterpretationRequest, ResponseFormat,
};

fn fail(e: &FortuneError) -> ! {
    tracing::error!(
        "❌ Fortune request failed: {} (Kind: {:?}, Category: {:?}, Severity: {:?})",
        e,
        e.kind(),
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    match serde_json::to_string_pretty(&e.to_envelope()) {
        Ok(body) => eprintln!("{}", body),
        Err(_) => eprintln!("❌ {}", e.user_friendly_message()),
    }

    let exit_code = match e.severity() {
        ErrorSeverity::High => 1,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting fortune CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            FortuneConfig::from_file(path).unwrap_or_else(|e| fail(&e))
        }
        None => FortuneConfig::default(),
    };

    let service = build_service(&config).unwrap_or_else(|e| fail(&e));

    let request = InterpretationRequest::new(
        BirthRecord::new(cli.birth_date.clone(), cli.birth_time.clone(), cli.gender),
        cli.fortune_type.clone(),
    );

    let format = if cli.extended {
        ResponseFormat::Extended
    } else {
        config.response_format()
    };

    match service.interpret(&request).await {
        Ok(result) => {
            let response = FortuneResponse::from_result(&result, format);
            match serde_json::to_string_pretty(&response) {
                Ok(body) => println!("{}", body),
                Err(e) => fail(&FortuneError::from(e)),
            }
        }
        Err(e) => fail(&e),
    }
}
