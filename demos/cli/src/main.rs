use std::path::PathBuf;

use activity_timeline_core::{Container, RenderPlan, TimelineCallbacks, TimelineConfig};
use activity_timeline_json::plan_from_str;
use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "activity-timeline-cli",
    about = "Tính bố cục timeline hoạt động từ file JSON sự kiện."
)]
struct Args {
    /// Đường dẫn tới file JSON chứa danh sách sự kiện.
    #[arg(short, long)]
    input: PathBuf,

    #[arg(long, default_value_t = Container::FALLBACK_WIDTH)]
    width: f64,

    #[arg(long, default_value_t = Container::FALLBACK_HEIGHT)]
    height: f64,

    #[arg(long, default_value = "Category")]
    category_field: String,

    #[arg(long, default_value = "Group")]
    group_field: String,

    #[arg(long, default_value = "StartTime")]
    from_field: String,

    #[arg(long, default_value = "EndTime")]
    to_field: String,

    /// Định dạng strftime cho nhãn giờ trong tooltip.
    #[arg(long, default_value = "%H:%M")]
    time_format: String,

    /// In toàn bộ render plan dạng JSON thay vì bản tóm tắt.
    #[arg(long)]
    json: bool,
}

impl Args {
    fn config(&self) -> TimelineConfig {
        TimelineConfig {
            from_field: self.from_field.clone(),
            to_field: self.to_field.clone(),
            category_field: self.category_field.clone(),
            group_field: self.group_field.clone(),
            time_label_format: self.time_format.clone(),
            ..TimelineConfig::default()
        }
    }
}

fn init_tracing() {
    // Log ra stderr để stdout chỉ chứa kết quả.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();
    let data = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Không đọc được file {:?}", args.input))?;

    let config = args.config();
    let container = Container::new(args.width, args.height);
    let plan = plan_from_str(&data, &config, &TimelineCallbacks::default(), &container)
        .with_context(|| format!("Không dựng được timeline từ {:?}", args.input))?;
    info!(bars = plan.bars.len(), "timeline laid out");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        print_summary(&plan);
    }

    Ok(())
}

fn print_summary(plan: &RenderPlan) {
    println!(
        "Domain: {} -> {}\nCategories: {}\nMax lanes: {}\nBars: {}",
        plan.domain_start,
        plan.domain_end,
        plan.bands.len(),
        plan.max_lanes,
        plan.bars.len()
    );
    for band in &plan.bands {
        println!("  {} ({} lane)", band.label, band.lanes.len());
    }
    let legend: Vec<&str> = plan.legend.items.iter().map(|item| item.tag.as_str()).collect();
    println!("Legend: {}", legend.join(", "));
}
