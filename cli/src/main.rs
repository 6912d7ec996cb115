#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod watch;

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use geojson::FeatureCollection;
use gtfs::{minutes_to_time_string, time_string_to_minutes, Stop, TripID};
use structopt::StructOpt;
use tokio::sync::mpsc;

use model::{
    stops_to_geojson, trip_to_geojson, Animation, Clock, DataSource, DatasetConfig, FixedClock,
    Schedule, ShapeLayer, SystemClock, Trajectory, TripDisplayData, VehicleFrame,
};

use self::watch::watch;

#[derive(StructOpt)]
#[structopt(name = "transit-viewer", about = "Load split GTFS files and follow vehicles")]
struct Args {
    /// A directory or http(s) URL holding the split files
    #[structopt(long, default_value = ".")]
    data: String,
    /// A TOML file overriding where each dataset lives
    #[structopt(long)]
    config: Option<PathBuf>,
    #[structopt(subcommand)]
    cmd: Command,
}

#[derive(StructOpt)]
enum Command {
    /// Load every stop
    Stops {
        /// Write the stops here as GeoJSON
        #[structopt(long)]
        geojson: Option<PathBuf>,
    },
    /// Load and assemble route shapes
    Shapes {
        #[structopt(long)]
        geojson: Option<PathBuf>,
    },
    /// List trips in progress, with where each vehicle is
    Trips {
        /// Use this time of day (HH:MM:SS) instead of now
        #[structopt(long)]
        at: Option<String>,
        /// How many trip IDs to list when nothing is running
        #[structopt(long, default_value = "20")]
        limit: usize,
    },
    /// Follow one vehicle along its trip
    Animate {
        /// Defaults to the first trip in progress
        #[structopt(long)]
        trip: Option<String>,
        /// Freeze the clock at this time of day (HH:MM:SS)
        #[structopt(long)]
        at: Option<String>,
        /// Stop after this many frames
        #[structopt(long, default_value = "10")]
        frames: usize,
        /// Write the trip and the final vehicle position here as GeoJSON
        #[structopt(long)]
        geojson: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::from_args();
    if let Err(err) = run(args).await {
        error!("{:#}", err);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let config = match args.config {
        Some(ref path) => DatasetConfig::from_toml(&fs_err::read_to_string(path)?)
            .with_context(|| format!("Bad config {}", path.display()))?,
        None => DatasetConfig::default(),
    };
    let source = DataSource::from_root(&args.data);

    match args.cmd {
        Command::Stops { geojson } => {
            let (session, watcher) = watch();
            let result = config
                .stops
                .loader(&source)
                .load_records::<Stop>(&session)
                .await;
            watcher.finish(session).await;
            let loaded = result?.ok_or_else(|| anyhow!("Loading stops was interrupted"))?;
            println!(
                "{} stops from {} of {} segments",
                loaded.data.len(),
                loaded.loaded_segments,
                loaded.info.segments.len()
            );
            for filename in &loaded.failed_segments {
                println!("  missing {filename}");
            }
            if let Some(path) = geojson {
                write_geojson(path, &stops_to_geojson(&loaded.data))?;
            }
        }
        Command::Shapes { geojson } => {
            let (session, watcher) = watch();
            let result = ShapeLayer::load(&source, &config, &session).await;
            watcher.finish(session).await;
            let layer = result?.ok_or_else(|| anyhow!("Loading shapes was interrupted"))?;
            println!("{} shapes", layer.shapes.len());
            for shape in &layer.shapes {
                println!(
                    "  {}: {} points, {}",
                    shape.shape_id,
                    shape.coordinates.len(),
                    layer.colors.get(&shape.shape_id).unwrap_or("?")
                );
            }
            if let Some(path) = geojson {
                write_geojson(path, &layer.to_geojson())?;
            }
        }
        Command::Trips { at, limit } => {
            let now = parse_time(at.as_deref())?;
            let schedule = load_schedule(&source, &config).await?;
            let active = schedule.active_trips(now);
            println!(
                "{} trips in progress at {}",
                active.len(),
                minutes_to_time_string(now)
            );
            for trip in &active {
                describe_trip(trip, now);
            }
            if active.is_empty() {
                println!("Some trips in the schedule:");
                for trip_id in schedule.available_trips(limit) {
                    println!("  {trip_id}");
                }
            }
        }
        Command::Animate {
            trip,
            at,
            frames,
            geojson,
        } => {
            let schedule = load_schedule(&source, &config).await?;
            let start = parse_time(at.as_deref())?;
            let trip = match trip {
                Some(id) => schedule
                    .trip(&TripID::new(id.clone()), start)
                    .ok_or_else(|| anyhow!("No stop times for trip {id}"))?,
                None => schedule
                    .active_trips(start)
                    .into_iter()
                    .next()
                    .ok_or_else(|| {
                        anyhow!("Nothing running at {}", minutes_to_time_string(start))
                    })?,
            };
            describe_trip(&trip, start);

            let trajectory = trip.trajectory();
            if trajectory.is_empty() {
                bail!("None of the stops on trip {} are known", trip.trip_id);
            }
            info!("Following {} past {} stops", trip.trip_id, trajectory.len());
            let interval = config.frame_interval();
            let last = match at {
                Some(_) => {
                    animate(trajectory, FixedClock(start), interval, frames, interrupted()).await
                }
                None => animate(trajectory, SystemClock, interval, frames, interrupted()).await,
            };
            if let Some(path) = geojson {
                write_geojson(path, &trip_to_geojson(&trip, last.as_ref()))?;
            }
        }
    }
    Ok(())
}

async fn load_schedule(source: &DataSource, config: &DatasetConfig) -> Result<Schedule> {
    let (session, watcher) = watch();
    let result = Schedule::load(source, config, &session).await;
    watcher.finish(session).await;
    result?.ok_or_else(|| anyhow!("Loading the schedule was interrupted"))
}

/// Prints up to `frames` positions, returning the last one. Gives up if the vehicle doesn't
/// appear for a while, and stops early once `interrupt` finishes.
async fn animate<C, I>(
    trajectory: Trajectory,
    clock: C,
    frame_interval: Duration,
    frames: usize,
    interrupt: I,
) -> Option<VehicleFrame>
where
    C: Clock + 'static,
    I: Future<Output = ()>,
{
    let (tx, mut rx) = mpsc::unbounded_channel();
    let animation = Animation::start(trajectory, clock, frame_interval, move |frame| {
        let _ = tx.send(frame);
    });
    tokio::pin!(interrupt);

    let mut last = None;
    for _ in 0..frames {
        tokio::select! {
            biased;
            _ = &mut interrupt => {
                info!("Interrupted, stopping the animation");
                break;
            }
            next = tokio::time::timeout(Duration::from_secs(1), rx.recv()) => match next {
                Ok(Some(frame)) => {
                    println!(
                        "{}  ({:.6}, {:.6})  segment {}, {:.1}%",
                        minutes_to_time_string(frame.time),
                        frame.pos.y,
                        frame.pos.x,
                        frame.segment,
                        frame.progress * 100.0
                    );
                    last = Some(frame);
                }
                Ok(None) => break,
                Err(_) => {
                    println!("The vehicle hasn't started yet");
                    break;
                }
            },
        }
    }
    animation.stop().await;
    last
}

/// Finishes on Ctrl-C. If the signal can't be listened for, never finishes.
async fn interrupted() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("Can't listen for Ctrl-C: {err}");
        std::future::pending::<()>().await;
    }
}

fn describe_trip(trip: &TripDisplayData, now: f64) {
    let latest = match trip.latest_passed {
        Some(idx) => trip.stops[idx].0.name.clone(),
        None => "not started".to_string(),
    };
    match trip.vehicle_at(now) {
        Some(frame) => println!(
            "  {} ({}): {} stops, last stop {}, at ({:.6}, {:.6})",
            trip.trip_id,
            trip.color,
            trip.stops.len(),
            latest,
            frame.pos.y,
            frame.pos.x
        ),
        None => println!(
            "  {} ({}): {} stops, {}",
            trip.trip_id,
            trip.color,
            trip.stops.len(),
            latest
        ),
    }
}

fn parse_time(at: Option<&str>) -> Result<f64> {
    match at {
        Some(time) => time_string_to_minutes(time).with_context(|| format!("Bad time {time}")),
        None => Ok(SystemClock.now_minutes()),
    }
}

fn write_geojson(path: PathBuf, collection: &FeatureCollection) -> Result<()> {
    fs_err::write(&path, serde_json::to_string_pretty(collection)?)?;
    info!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::coord;

    fn trajectory() -> Trajectory {
        Trajectory::new(vec![
            (coord! { x: 0.0, y: 0.0 }, Some(480.0), Some(480.0)),
            (coord! { x: 10.0, y: 0.0 }, Some(490.0), Some(490.0)),
        ])
    }

    #[tokio::test(start_paused = true)]
    async fn test_interrupt_ends_a_long_animation() {
        let last = animate(
            trajectory(),
            FixedClock(485.0),
            Duration::from_millis(16),
            usize::MAX,
            tokio::time::sleep(Duration::from_millis(200)),
        )
        .await;
        let frame = last.unwrap();
        assert_eq!(frame.pos, coord! { x: 5.0, y: 0.0 });
    }

    #[tokio::test(start_paused = true)]
    async fn test_interrupt_before_any_frame() {
        let last = animate(
            trajectory(),
            FixedClock(485.0),
            Duration::from_millis(16),
            usize::MAX,
            std::future::ready(()),
        )
        .await;
        assert!(last.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_vehicle_not_started() {
        let last = animate(
            trajectory(),
            FixedClock(400.0),
            Duration::from_millis(16),
            5,
            std::future::pending(),
        )
        .await;
        assert!(last.is_none());
    }
}
