//! 경제 캘린더 동기화 CLI.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use refdata_collector::{mask_database_url, modules, CollectorConfig, CollectorError};
use refdata_core::EventStore;
use refdata_data::{Database, DatabaseConfig, MemoryEventStore, PgEventStore};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "refdata-collector")]
#[command(about = "Economic calendar sync daemon", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// 인메모리 저장소 사용 (DATABASE_URL 불필요)
    #[arg(long, global = true)]
    dry_run: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// 데몬 모드: 주기적으로 캘린더 동기화 (기본값)
    Daemon,

    /// 한 번 동기화 후 예정 이벤트 목록 출력
    RunOnce,

    /// 넓은 전방 구간으로 한 번 동기화 (재적재)
    Backfill {
        /// 전방 구간 (일, 기본: CALENDAR_BACKFILL_FORWARD_DAYS)
        #[arg(long)]
        days: Option<u32>,
    },

    /// 저장된 예정 이벤트 조회 (피드 호출 없음)
    Upcoming {
        /// 조회 구간 (일, 기본: CALENDAR_LISTING_WINDOW_DAYS)
        #[arg(long)]
        days: Option<u32>,
    },

    /// 저장소 상태 (전체 건수, 다음 이벤트)
    Status,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "refdata_collector={},refdata_data={}",
                    cli.log_level, cli.log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("RefData Calendar Collector 시작");

    let config = CollectorConfig::from_env()?;

    let (store, database): (Arc<dyn EventStore>, Option<Database>) = if cli.dry_run {
        tracing::warn!("dry-run 모드: 인메모리 저장소 사용, 결과는 저장되지 않습니다");
        (Arc::new(MemoryEventStore::new()), None)
    } else {
        let database_url = config.require_database_url()?;
        tracing::debug!(database_url = %mask_database_url(database_url), "설정 로드 완료");

        let db_config = DatabaseConfig::for_daemon(database_url)
            .with_max_connections(config.db_max_connections);
        let db = Database::connect(&db_config)
            .await
            .map_err(CollectorError::from)?;
        (Arc::new(PgEventStore::new(db.pool().clone())), Some(db))
    };

    store.ensure_schema().await.map_err(CollectorError::from)?;

    let command = cli.command.unwrap_or(Commands::Daemon);
    let result = run_command(command, &config, store).await;

    if let Some(db) = database {
        db.close().await;
    }

    if let Err(e) = result {
        if e.is_fatal() {
            tracing::error!(error = %e, "설정/연결 에러로 종료");
        } else {
            tracing::error!(error = %e, "캘린더 동기화 실패");
        }
        return Err(e.into());
    }

    tracing::info!("RefData Calendar Collector 종료");
    Ok(())
}

/// 서브커맨드 실행.
async fn run_command(
    command: Commands,
    config: &CollectorConfig,
    store: Arc<dyn EventStore>,
) -> refdata_collector::Result<()> {
    let now = chrono::Utc::now();

    match command {
        Commands::Upcoming { days } => {
            let days = days.unwrap_or(config.calendar.listing_window_days);
            let events = modules::list_upcoming(store.as_ref(), now, days).await?;
            modules::print_upcoming(&events, days);
        }
        Commands::Status => {
            let total = store.count().await?;
            let next = modules::next_event(
                store.as_ref(),
                now,
                config.calendar.backfill_forward_days,
            )
            .await?;

            println!("\n📊 캘린더 저장소 상태 ({}):", store.backend_name());
            println!("  총 이벤트: {}", total);
            match next {
                Some(event) => println!("  다음 이벤트:\n{}", modules::format_event_line(&event)),
                None => println!("  다음 이벤트: 없음"),
            }
        }
        Commands::RunOnce => {
            let provider = config.feed.build_provider()?;
            let report =
                modules::run_once(provider.as_ref(), store.as_ref(), &config.calendar, now)
                    .await?;
            modules::print_upcoming(&report.upcoming, config.calendar.listing_window_days);
        }
        Commands::Backfill { days } => {
            let provider = config.feed.build_provider()?;
            modules::run_backfill(
                provider.as_ref(),
                store.as_ref(),
                &config.calendar,
                now,
                days,
            )
            .await?;
        }
        Commands::Daemon => {
            let provider = config.feed.build_provider()?;
            let shutdown = CancellationToken::new();
            tokio::spawn(shutdown_signal(shutdown.clone()));

            let sync_loop = modules::CalendarSyncLoop::new(
                provider,
                store,
                config.calendar.clone(),
                shutdown,
            );
            let state = sync_loop.run().await;

            tracing::info!(
                phase = ?state.phase,
                completed = state.passes_completed,
                failed = state.passes_failed,
                last_sync_at = ?state.last_sync_at,
                "데몬 종료"
            );
        }
    }

    Ok(())
}

/// 종료 시그널 대기.
///
/// Ctrl+C 또는 SIGTERM 시그널을 수신하면 종료 토큰을 취소합니다.
async fn shutdown_signal(shutdown_token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Ctrl+C 핸들러 등록 실패");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "SIGTERM 핸들러 등록 실패");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::warn!("Ctrl+C 수신, 종료 시작");
        }
        _ = terminate => {
            tracing::warn!("SIGTERM 수신, 종료 시작");
        }
    }

    shutdown_token.cancel();
}
