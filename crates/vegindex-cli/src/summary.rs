use console::Style;
use vegindex_core::pipeline::{RunContext, RunReport};
use vegindex_core::roi::RoiList;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    disabled: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }
}

fn print_title(s: &Styles, title: &str) {
    println!();
    println!("  {}", s.title.apply_to(title));
    println!(
        "  {}",
        s.title.apply_to("\u{2550}".repeat(title.chars().count()))
    );
    println!();
}

fn optional(s: &Styles, value: Option<f64>) -> String {
    match value {
        Some(v) => s.value.apply_to(v).to_string(),
        None => s.disabled.apply_to("unknown").to_string(),
    }
}

/// Print the resolved run configuration before a run starts.
pub fn print_run_summary(title: &str, ctx: &RunContext<'_>, nday: Option<u32>) {
    let s = Styles::new();
    print_title(&s, title);

    println!(
        "  {:<14}{}",
        s.label.apply_to("Archive"),
        s.path.apply_to(ctx.archive.root.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Site"),
        s.value.apply_to(&ctx.archive.site)
    );
    println!("  {:<14}{}", s.label.apply_to("ROI"), s.value.apply_to(&ctx.roi));
    println!(
        "  {:<14}{}, {}",
        s.label.apply_to("Location"),
        optional(&s, ctx.location.lat),
        optional(&s, ctx.location.lon)
    );
    if ctx.options.dry_run {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Mode"),
            s.disabled.apply_to("dry run, nothing is written")
        );
    }
    println!();

    let Some(nday) = nday else {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Resize"),
            s.value
                .apply_to(if ctx.config.roi_timeseries.resize { "yes" } else { "no" })
        );
        println!();
        return;
    };

    let selection = &ctx.config.gcc90_calculation;
    println!("  {}", s.header.apply_to("Selection"));
    println!("    {:<14}{}", s.label.apply_to("Period"), s.value.apply_to(format!("{nday} day")));
    println!(
        "    {:<14}{}",
        s.label.apply_to("Min images"),
        s.value.apply_to(selection.nimage_threshold)
    );
    println!(
        "    {:<14}{}",
        s.label.apply_to("Time of day"),
        s.value
            .apply_to(format!("{} - {}", selection.time_min, selection.time_max))
    );
    println!(
        "    {:<14}{}",
        s.label.apply_to("Sun elev"),
        s.value.apply_to(format!(">= {}", selection.sunelev_min))
    );
    println!(
        "    {:<14}{}",
        s.label.apply_to("Brightness"),
        s.value
            .apply_to(format!("{} - {}", selection.brt_min, selection.brt_max))
    );
    println!();
}

/// Print end-of-run counts.
pub fn print_report(report: &RunReport, unit: &str) {
    let s = Styles::new();
    println!(
        "  {:<18}{}",
        s.label.apply_to(format!("{unit} processed")),
        s.value.apply_to(report.processed)
    );
    println!(
        "  {:<18}{}",
        s.label.apply_to(format!("{unit} added")),
        s.value.apply_to(report.added)
    );
    println!(
        "  {:<18}{}",
        s.label.apply_to("Total"),
        s.value.apply_to(report.total)
    );
}

/// Print an ROI list and its intervals.
pub fn print_roi_list(list: &RoiList) {
    let s = Styles::new();
    print_title(&s, &format!("ROI List {}", list.name()));

    println!("  {:<14}{}", s.label.apply_to("Owner"), s.value.apply_to(&list.owner));
    println!(
        "  {:<14}{}",
        s.label.apply_to("Description"),
        s.value.apply_to(&list.description)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Updated"),
        s.value.apply_to(list.updated_at.format("%Y-%m-%d %H:%M:%S"))
    );
    println!();

    println!("  {}", s.header.apply_to("Masks"));
    for (i, mask) in list.masks.iter().enumerate() {
        println!(
            "    {}. {}  {} .. {}",
            s.label.apply_to(i + 1),
            s.path.apply_to(&mask.maskfile),
            s.value.apply_to(mask.start.format("%Y-%m-%d %H:%M:%S")),
            s.value.apply_to(mask.end.format("%Y-%m-%d %H:%M:%S"))
        );
    }
    println!();
}
