use kpi_card::{
    AnimationGeneration, CardConfig, KpiCard, QuickSelection, TabularRow, Viewport, ViewportCache,
};
use tracing_subscriber::EnvFilter;

const OPTIONS: &str = r##"{
    "trendMode": "area",
    "trendCorners": "smooth",
    "deltaPoints": 3,
    "deltaAgg": "avg",
    "valuePrefix": "$",
    "numberFormat": "#,##0"
}"##;

fn main() -> kpi_card::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let rows: Vec<TabularRow> = (0..90)
        .map(|day| {
            let x = day as f64 * 0.15;
            let revenue = 12_000.0 + 2_500.0 * x.sin() + 40.0 * day as f64;
            TabularRow::new(format!("2024-{:02}-{:02}", day / 30 + 1, day % 30 + 1), day as f64, revenue)
        })
        .collect();

    // Hosts usually deliver rows as JSON.
    let wire = r#"[{"dimension": {"text": "2024-04-01", "number": 90}, "measure": {"number": 15800}}]"#;
    let extra: Vec<TabularRow> = serde_json::from_str(wire)?;
    let rows: Vec<TabularRow> = rows.into_iter().chain(extra).collect();

    let card = KpiCard::new(CardConfig::from_json(OPTIONS)?);
    let viewport = Viewport::new(240.0, 48.0);
    let mut cache = ViewportCache::new();
    cache.update(viewport);

    let frame = card.render(&rows, viewport);
    println!("kpi:    {}", frame.kpi_text);
    if let Some(delta) = &frame.delta_display {
        println!("delta:  {}", delta.label());
    }
    if let Some((start, end)) = &frame.labels {
        println!("range:  {start} .. {end}");
    }
    if let Some(sparkline) = &frame.sparkline {
        println!("line:   {}", sparkline.line());
        if let Some(fill) = sparkline.fill() {
            println!("area:   {fill}");
        }
        for marker in sparkline.markers() {
            println!("marker: {:?} at {:?}", marker.kind, marker.position);
        }
        if let Some(tooltip) = sparkline.hit_test(120.0, card.formatter()) {
            println!("hover:  {}", tooltip.text);
        }
    }

    let generation = AnimationGeneration::new();
    if let Some(counter) = card.counter(&frame, &generation) {
        for elapsed in [0.0, 250.0, 500.0, 1000.0] {
            if let Some(step) = counter.frame(elapsed) {
                println!("count:  {elapsed:>6}ms {}", step.text);
            }
        }
    }

    let buttons = card.config().quick_buttons.clone().unwrap_or_default();
    let mut selection = QuickSelection::default();
    let window = selection.click(&buttons, 12);
    let zoomed = card.render_with_selection(&rows, viewport, selection.held());
    println!(
        "quick:  {:?} -> {} points",
        window,
        zoomed.sparkline.map_or(0, |sparkline| sparkline.points().len())
    );

    if !cache.update(Viewport::new(240.3, 47.8)) {
        println!("resize: skipped sub-pixel change");
    }
    Ok(())
}
