//! Swim Race entry point
//!
//! The browser build is driven from JavaScript through `swim_race::web`.
//! Natively this runs a headless scripted race and logs the results.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use swim_race::consts::SIM_DT_MS;
    use swim_race::sim::{self, DiveOutcome, RaceEvent, RacePhase, Side};
    use swim_race::{HighScoreBook, ScoreTable, Settings};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut settings = Settings::load();
    if let Some(seed) = std::env::args().nth(1).and_then(|s| s.parse().ok()) {
        settings.seed = Some(seed);
    }
    let seed = settings.seed.unwrap_or(0x5eed);

    let participants = settings.participants();
    let mut race = match sim::start_race(&participants, settings.race_distance_m, seed) {
        Ok(race) => race,
        Err(e) => {
            log::error!("Could not set up race: {}", e);
            std::process::exit(1);
        }
    };
    log::info!(
        "Swim Race starting ({} {}m)",
        settings.stroke.as_str(),
        settings.race_distance_m
    );

    // Scripted swimmer: dives 180ms after the signal, strokes every 400ms
    let mut now = 0.0;
    let mut next_stroke: Option<f64> = None;
    let mut side = Side::Left;

    while race.phase() != RacePhase::Finished {
        now += SIM_DT_MS;
        sim::tick(&mut race, now, SIM_DT_MS);

        if let Some(start) = race.start_instant_ms() {
            if next_stroke.is_none() && now - start >= 180.0 {
                if let DiveOutcome::Accepted(attempt) = sim::register_dive(&mut race, now) {
                    log::info!("Dive: {}", attempt.tier.label());
                }
                next_stroke = Some(now + 400.0);
            }
        }
        if let Some(at) = next_stroke {
            if now >= at {
                sim::register_input(&mut race, now, side);
                side = side.other();
                next_stroke = Some(at + 400.0);
            }
        }

        for event in race.drain_events() {
            match event {
                RaceEvent::Countdown(n) => log::info!("{}...", n),
                RaceEvent::Start { .. } => log::info!("GO!"),
                _ => {}
            }
        }
    }

    let Some(order) = race.finish_order() else {
        return;
    };
    for entry in order {
        let who = if Some(entry.participant_id) == race.human_lane() {
            "you"
        } else {
            "AI"
        };
        println!(
            "{}. lane {} ({}) {:.2}s{}",
            entry.place,
            entry.participant_id,
            who,
            entry.time_s,
            if entry.forced { " (time limit)" } else { "" }
        );
    }

    if let Some(human) = race.human_lane() {
        if let Some(entry) = order.iter().find(|e| e.participant_id == human && !e.forced) {
            let mut book = HighScoreBook::load();
            if book.is_qualifying(settings.stroke, entry.time_s) {
                let name = &settings.player_name;
                if let Some(rank) = book.record(settings.stroke, entry.time_s, name, entry.place) {
                    println!("New high score! Rank #{}", rank);
                    book.save();
                }
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}
