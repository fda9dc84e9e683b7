//! Mantis - Rust 桌面自动化智能体
//!
//! 入口：初始化日志与配置，从命令行参数或标准输入取指令，逐条跑会话
//! （串行，一次一个；Ctrl-C 取消当前会话）。

use std::io::{BufRead, Write};

use anyhow::Context;
use tokio_util::sync::CancellationToken;

use mantis::config::load_config;
use mantis::{create_agent_components, observability, run_session, SessionStatus};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    observability::init();

    let cfg = load_config(None).context("Failed to load config")?;
    let working_dir = match cfg.app.working_dir.clone() {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to resolve current directory")?,
    };
    std::fs::create_dir_all(&working_dir).context("Failed to create working directory")?;

    let components = create_agent_components(&cfg, &working_dir);

    let instruction: String = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    if !instruction.trim().is_empty() {
        run_one(&components, instruction.trim()).await;
        return Ok(());
    }

    // 交互模式：一行一条指令，串行执行（键鼠是独占资源，不并行会话）
    println!("mantis ready. Type an instruction, or 'exit' to quit.");
    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush().ok();
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "exit" || line == "quit" {
            break;
        }
        run_one(&components, line).await;
    }

    Ok(())
}

async fn run_one(components: &mantis::AgentComponents, instruction: &str) {
    let cancel_token = CancellationToken::new();
    let guard = cancel_token.clone();
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            guard.cancel();
        }
    });

    let outcome = run_session(components, instruction, cancel_token).await;
    ctrl_c.abort();

    match outcome.status {
        SessionStatus::Halted => println!("✔ {}", outcome.summary),
        SessionStatus::Aborted => println!("✘ {}", outcome.summary),
    }
}
