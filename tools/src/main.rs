//! ops-runner: headless runner for the operations center simulation.
//!
//! Usage:
//!   ops-runner --seed 12345 --ticks 600
//!   ops-runner --seed 12345 --ticks 600 --autopilot --data-dir ./data
//!   ops-runner --seed 12345 --ipc-mode

use anyhow::Result;
use opscenter_core::{
    command::PlayerCommand,
    config::SimConfig,
    emergency::EmergencyStatus,
    engine::SimEngine,
};
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    Tick {
        count: u64,
    },
    /// Wall time elapsed on the client; converted to ticks at the
    /// current speed, none while paused.
    Advance {
        real_ms: u64,
    },
    Command {
        command: PlayerCommand,
    },
    Quit,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let ticks = parse_arg(&args, "--ticks", 600u64);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let autopilot = args.iter().any(|a| a == "--autopilot");
    let data_dir = args
        .windows(2)
        .find(|w| w[0] == "--data-dir")
        .map(|w| w[1].as_str());

    let config = match data_dir {
        Some(dir) => SimConfig::load(dir)?,
        None => SimConfig::default(),
    };

    if !ipc_mode {
        println!("Operations Center ops-runner");
        println!("  seed:      {seed}");
        println!("  ticks:     {ticks}");
        println!("  autopilot: {autopilot}");
        println!("  data_dir:  {}", data_dir.unwrap_or("(defaults)"));
        println!();
    }

    let run_id = format!("run-{seed}");
    let mut engine = SimEngine::new(run_id.clone(), seed, config)?;

    if ipc_mode {
        run_ipc_loop(&mut engine)?;
    } else {
        run_headless(&mut engine, ticks, autopilot)?;
        print_summary(&engine, ticks);
    }

    Ok(())
}

fn run_ipc_loop(engine: &mut SimEngine) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
                stdout.flush()?;
                continue;
            }
        };

        match cmd {
            IpcCommand::Quit => break,
            IpcCommand::Tick { count } => {
                engine.run_ticks(count)?;
            }
            IpcCommand::Advance { real_ms } => {
                engine.advance_real(real_ms)?;
            }
            IpcCommand::GetState => {}
            IpcCommand::Command { command } => {
                engine.apply_command(command)?;
            }
        }
        writeln!(stdout, "{}", serde_json::to_string(&engine.snapshot())?)?;
        stdout.flush()?;
    }
    Ok(())
}

fn run_headless(engine: &mut SimEngine, ticks: u64, autopilot: bool) -> Result<()> {
    for _ in 0..ticks {
        if autopilot {
            dispatch_idle_operators(engine)?;
        }
        engine.run_ticks(1)?;
    }
    Ok(())
}

/// Pair idle operators with the oldest unassigned emergencies.
fn dispatch_idle_operators(engine: &mut SimEngine) -> Result<()> {
    let waiting: Vec<String> = engine
        .emergencies()
        .iter()
        .filter(|e| e.status == EmergencyStatus::Active)
        .map(|e| e.id.clone())
        .collect();
    let idle = engine.idle_operator_ids();

    for (emergency_id, operator_id) in waiting.iter().zip(idle.iter()) {
        log::debug!("autopilot: {operator_id} -> {emergency_id}");
        engine.assign_operator(emergency_id, operator_id)?;
    }
    Ok(())
}

fn print_summary(engine: &SimEngine, ticks: u64) {
    let snapshot = engine.snapshot();
    let stats = snapshot.session.stats;
    let count = |status: EmergencyStatus| {
        snapshot.emergencies.iter().filter(|e| e.status == status).count()
    };

    println!("=== RUN SUMMARY ===");
    println!("  run_id:          {}", snapshot.run_id);
    println!("  ticks run:       {ticks}");
    println!("  final tick:      {} ({})", snapshot.tick, snapshot.elapsed);
    println!("  emergencies:     {}", snapshot.emergencies.len());
    println!("  active:          {}", count(EmergencyStatus::Active));
    println!("  assigned:        {}", count(EmergencyStatus::Assigned));
    println!("  resolved:        {}", count(EmergencyStatus::Resolved));
    println!("  failed:          {}", count(EmergencyStatus::Failed));
    println!("  success rate:    {}%", stats.success_rate);
    println!("  avg response:    {}s", stats.average_response_time);
    println!("  ignored cmds:    {}", snapshot.ignored_commands);

    println!();
    println!("=== ROSTER ===");
    for op in &snapshot.operators {
        println!(
            "  {:<15} {:<10} exp {:>3} | fire {:>3} med {:>3} sec {:>3} tech {:>3} | {:?}",
            op.name,
            format!("{:?}", op.specialty),
            op.experience,
            op.skills.fire,
            op.skills.medical,
            op.skills.security,
            op.skills.technical,
            op.status,
        );
    }
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
