use std::path::PathBuf;

use colored::{ColoredString, Colorize};
use comfy_table::{ContentArrangement, Table};

use dw_core::{Team, Vec2};
use dw_simulation::{SimEventKind, Simulation, Snapshot};

/// Everything `dw run` accepts on the command line.
pub struct RunOptions {
    pub seconds: f32,
    pub dt: f32,
    pub seed: Option<u64>,
    pub fleet_size: Option<usize>,
    pub speed: Option<f32>,
    pub spawn_rate: Option<f32>,
    pub show_paths: bool,
    pub reserve: bool,
    pub team: Option<String>,
    pub config: Option<PathBuf>,
    pub json: bool,
    pub output: Option<PathBuf>,
    pub verbose: bool,
}

pub fn run(opts: &RunOptions) -> Result<(), String> {
    let team_filter = opts
        .team
        .as_deref()
        .map(|name| {
            Team::parse(name)
                .ok_or_else(|| format!("unknown team: \"{name}\". Use: a, b, blue, red"))
        })
        .transpose()?;

    let mut config = super::load_config(opts.config.as_deref())?;
    if let Some(seed) = opts.seed {
        config = config.with_seed(seed);
    }
    if let Some(size) = opts.fleet_size {
        config = config.with_fleet_size(size);
    }
    if let Some(speed) = opts.speed {
        config = config.with_speed(speed);
    }
    if let Some(rate) = opts.spawn_rate {
        config = config.with_spawn_rate(rate);
    }
    if opts.show_paths {
        config = config.with_path_visible(true);
    }
    if opts.reserve {
        config = config.with_reserve_targets(true);
    }

    let mut sim = Simulation::new(config);
    let ticks = sim
        .run_for(opts.seconds, opts.dt)
        .map_err(|e| format!("simulation error: {e}"))?;
    let snapshot = sim.snapshot();

    if let Some(path) = &opts.output {
        std::fs::write(path, super::to_json(&snapshot)?)
            .map_err(|e| format!("cannot write to {}: {e}", path.display()))?;
    }
    if opts.json {
        println!("{}", super::to_json(&snapshot)?);
        return Ok(());
    }

    let config = sim.config();
    println!(
        "  {} {}",
        "Match".bold(),
        format!(
            "({ticks} ticks, {:.1}s, seed={}, fleet={}, speed={}, spawn every {}s)",
            snapshot.elapsed, config.seed, config.fleet_size, config.speed, config.spawn_rate
        )
        .dimmed()
    );
    let events = sim.events();
    println!(
        "  {} resources on field, {} collections, {} events logged",
        snapshot.resources.len(),
        events.collections().count(),
        events.len()
    );
    if events.dropped() > 0 {
        println!(
            "  {}",
            format!("({} older events dropped)", events.dropped()).dimmed()
        );
    }
    println!();

    if opts.verbose {
        println!("  {}", "Event Log".bold().underline());
        println!();
        for event in events.iter() {
            let tick_label = format!("[tick {:>4}]", event.tick).dimmed();
            let desc = colorize_event(&event.kind, &event.description);
            println!("  {tick_label} {desc}");
        }
        println!();
    }

    print_scores(&snapshot);
    print_agents(&snapshot, team_filter, opts.show_paths);

    if let Some(path) = &opts.output {
        println!("  Snapshot written to {}", path.display());
    }
    Ok(())
}

fn print_scores(snapshot: &Snapshot) {
    println!("  {}", "Scores".bold().underline());
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Team", "Score", "Agents", "Carrying"]);
    for team in Team::ALL {
        let agents: Vec<_> = snapshot.agents_of(team).collect();
        table.add_row(vec![
            team_label(team).to_string(),
            snapshot.scores.get(team).to_string(),
            agents.len().to_string(),
            agents.iter().filter(|a| a.carrying).count().to_string(),
        ]);
    }
    println!("{table}");

    let (a, b) = (snapshot.scores.a, snapshot.scores.b);
    let verdict = match a.cmp(&b) {
        std::cmp::Ordering::Greater => format!("{} leads {a}-{b}", team_label(Team::A)),
        std::cmp::Ordering::Less => format!("{} leads {b}-{a}", team_label(Team::B)),
        std::cmp::Ordering::Equal => format!("Draw at {a}-{b}"),
    };
    println!("  {}", verdict.bold());
    println!();
}

fn print_agents(snapshot: &Snapshot, filter: Option<Team>, show_paths: bool) {
    println!("  {}", "Agents".bold().underline());
    println!();

    let mut header = vec!["Agent", "Team", "State", "Position", "Carrying"];
    if show_paths {
        header.push("Path");
    }
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header);

    for agent in snapshot
        .agents
        .iter()
        .filter(|a| filter.is_none_or(|team| a.team == team))
    {
        let mut row = vec![
            agent.id.to_string(),
            team_label(agent.team).to_string(),
            agent.state.to_string(),
            format_point(agent.position),
            if agent.carrying { "yes" } else { "no" }.to_string(),
        ];
        if show_paths {
            let path: Vec<String> = agent.path.iter().copied().map(format_point).collect();
            row.push(path.join(" -> "));
        }
        table.add_row(row);
    }
    println!("{table}");
    println!();
}

fn team_label(team: Team) -> ColoredString {
    match team {
        Team::A => "Team A".blue().bold(),
        Team::B => "Team B".red().bold(),
    }
}

fn colorize_event(kind: &SimEventKind, description: &str) -> ColoredString {
    match kind {
        SimEventKind::Collected { .. } => description.green().bold(),
        SimEventKind::CollectionLost { .. } | SimEventKind::TargetLost { .. } => {
            description.yellow()
        }
        SimEventKind::TargetAcquired { .. } | SimEventKind::CollectionStarted { .. } => {
            description.cyan()
        }
        SimEventKind::UnloadStarted { .. } | SimEventKind::Unloaded { .. } => description.blue(),
        SimEventKind::FleetRebuilt { .. } => description.magenta(),
        SimEventKind::ResourceSpawned { .. } => description.normal(),
    }
}

fn format_point(p: Vec2) -> String {
    format!("({:.2}, {:.2})", p.x, p.y)
}
