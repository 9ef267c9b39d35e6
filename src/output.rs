use console::Style;

use crate::report::Report;
use crate::runner::MutantOutcome;

pub fn print_error(msg: &str) {
    let style = Style::new().red().bold();
    eprintln!("{} {}", style.apply_to("✗"), msg);
}

pub fn print_warning(msg: &str) {
    let style = Style::new().yellow().bold();
    eprintln!("{} {}", style.apply_to("!"), msg);
}

pub fn print_success(msg: &str) {
    let style = Style::new().green().bold();
    println!("{} {}", style.apply_to("✓"), msg);
}

pub fn print_report(report: &Report) {
    let rate_pct = report.detection_rate * 100.0;

    if report.survived_count == 0 && report.errored_count == 0 {
        let style = Style::new().green().bold();
        println!(
            "{} {} mutants, all detected ({:.1}%) in {:.1}s — grade {} score {}",
            style.apply_to("✓"),
            report.total_mutations,
            rate_pct,
            report.duration_ms as f64 / 1000.0,
            report.grade,
            report.quality_score,
        );
    } else {
        let style = Style::new().yellow().bold();
        println!(
            "{} {} survived / {} detected of {} mutants ({:.1}% detected) in {:.1}s — grade {} score {}",
            style.apply_to("!"),
            report.survived_count,
            report.detected_count,
            report.total_mutations,
            rate_pct,
            report.duration_ms as f64 / 1000.0,
            report.grade,
            report.quality_score,
        );
    }

    if report.errored_count > 0 {
        let dim = Style::new().dim();
        println!(
            "  {} {} mutants errored (not counted toward the detection rate)",
            dim.apply_to("·"),
            report.errored_count
        );
    }
    for file in &report.failed_files {
        let dim = Style::new().dim();
        println!("  {} skipped {}", dim.apply_to("·"), file);
    }

    if !report.per_kind_stats.is_empty() {
        println!();
        for stat in &report.per_kind_stats {
            let kind_style = Style::new().magenta();
            println!(
                "  {} {}/{} detected ({:.1}%)",
                kind_style.apply_to(format!("{:<14}", stat.kind.name())),
                stat.detected_count,
                stat.total,
                stat.detection_rate * 100.0,
            );
        }
    }

    let survivors: Vec<_> = report
        .raw_results
        .iter()
        .filter(|r| r.outcome == MutantOutcome::Survived)
        .collect();
    if !survivors.is_empty() {
        println!();
        for (i, r) in survivors.iter().enumerate() {
            let ref_style = Style::new().cyan().bold();
            let loc_style = Style::new().dim();
            let kind_name = r.kind.map(|k| k.name()).unwrap_or("cumulative");
            println!(
                "  {} {}",
                ref_style.apply_to(format!("@m{}", i + 1)),
                loc_style.apply_to(format!("[{}]", kind_name)),
            );
            for line in r.diff.lines() {
                if line.starts_with('-') {
                    println!("    {}", Style::new().red().apply_to(line));
                } else if line.starts_with('+') {
                    println!("    {}", Style::new().green().apply_to(line));
                }
            }
        }
    }

    println!();
    for rec in &report.recommendations {
        let dim = Style::new().dim();
        println!("  {} {}", dim.apply_to("→"), rec);
    }
}

pub fn print_status(report: &Report) {
    println!(
        "Last run: {} mutants, {} detected, {} survived, {} errored ({:.1}% detected, grade {})",
        report.total_mutations,
        report.detected_count,
        report.survived_count,
        report.errored_count,
        report.detection_rate * 100.0,
        report.grade,
    );
    for rec in &report.recommendations {
        println!("  → {}", rec);
    }
}
