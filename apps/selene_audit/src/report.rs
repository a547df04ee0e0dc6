use anyhow::Context;
use selene::aspects::{AuditRecord, AuditReport, ChartPositions};
use std::fs;
use std::path::Path;

pub fn load_chart(path: &Path) -> anyhow::Result<ChartPositions> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read chart {}", path.display()))?;
    let mut chart: ChartPositions = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse chart {}", path.display()))?;
    if chart.bodies.len() < 2 {
        anyhow::bail!(
            "Chart {} needs at least two bodies, found {}",
            path.display(),
            chart.bodies.len()
        );
    }
    if chart.label.is_empty() {
        chart.label = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
    }
    Ok(chart)
}

pub fn write_report_json(path: &Path, report: &AuditReport) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create out dir {}", parent.display()))?;
    }
    let text = serde_json::to_string_pretty(report)?;
    fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

fn verdict(applying: bool) -> &'static str {
    if applying {
        "applying"
    } else {
        "separating"
    }
}

pub fn format_record(record: &AuditRecord) -> String {
    let mut line = format!(
        "{} {} {} orb={:.2} enhanced={} authoritative={}",
        record.primary,
        record.aspect_type,
        record.secondary,
        record.orb_from_exact,
        verdict(record.enhanced_applying),
        verdict(record.authoritative_applying),
    );
    if record.simple_applying != record.authoritative_applying {
        line.push_str(&format!(" unsigned={}", verdict(record.simple_applying)));
    }
    line.push_str(&format!(" rate={:+.3}°/d", record.orb_change_rate));
    if let Some(moon) = record.moon_applying {
        line.push_str(&format!(" moon={}", verdict(moon)));
    }
    if record.involves_retrograde() {
        line.push_str(" [retrograde]");
    }
    if record.near_sign_boundary() {
        line.push_str(" [sign boundary]");
    }
    line
}

pub fn print_report(report: &AuditReport, show: usize) {
    let s = &report.summary;
    println!("{}", report.label);
    println!(
        "  aspects: {}  agree: {}  disagree: {}  accuracy: {:.1}%",
        s.total, s.agreements, s.disagreements, s.accuracy
    );
    println!(
        "  authoritative: {} applying / {} separating",
        s.authoritative_applying, s.authoritative_separating
    );
    println!(
        "  enhanced:      {} applying / {} separating",
        s.enhanced_applying, s.enhanced_separating
    );
    println!(
        "  unsigned check: {} agree / {} disagree with authoritative",
        s.simple_agreements, s.simple_disagreements
    );
    println!(
        "  disagreements with retrograde: {}  near sign boundary: {}",
        s.retrograde_disagreements, s.sign_boundary_disagreements
    );
    if s.negation_violations > 0 {
        println!("  moon predicate negation violations: {}", s.negation_violations);
    }
    let flagged = report
        .records
        .iter()
        .filter(|r| !r.agrees() || !r.simple_agrees());
    for record in flagged.take(show) {
        println!("  - {}", format_record(record));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use selene::aspects::{audit_chart, AspectCalculator, AspectSettings};

    const CHART: &str = r#"{
        "bodies": [
            { "id": "moon", "longitude": 299.5956, "speed": 11.9326, "distinguished": true },
            { "id": "venus", "longitude": 216.6997, "speed": 1.1759 }
        ]
    }"#;

    #[test]
    fn test_load_chart_defaults_label_to_file_stem() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let p = dir.path().join("natal.json");
        fs::write(&p, CHART)?;
        let chart = load_chart(&p)?;
        assert_eq!(chart.label, "natal");
        assert_eq!(chart.bodies.len(), 2);
        assert!(chart.bodies[0].distinguished);
        assert!(!chart.bodies[1].distinguished);
        Ok(())
    }

    #[test]
    fn test_load_chart_rejects_single_body() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let p = dir.path().join("lonely.json");
        fs::write(&p, r#"{ "bodies": [ { "id": "sun", "longitude": 1.0, "speed": 1.0 } ] }"#)?;
        assert!(load_chart(&p).is_err());
        Ok(())
    }

    #[test]
    fn test_write_report_creates_parent_dirs() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let src = dir.path().join("chart.json");
        fs::write(&src, CHART)?;
        let chart = load_chart(&src)?;
        let report = audit_chart(&AspectCalculator::default(), &chart, &AspectSettings::default())?;

        let out = dir.path().join("nested").join("audit.json");
        write_report_json(&out, &report)?;
        let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out)?)?;
        assert_eq!(value["label"], "chart");
        assert_eq!(value["summary"]["total"], report.summary.total);
        Ok(())
    }

    #[test]
    fn test_format_record_marks_moon_verdict() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let src = dir.path().join("chart.json");
        fs::write(&src, CHART)?;
        let chart = load_chart(&src)?;
        let report = audit_chart(&AspectCalculator::default(), &chart, &AspectSettings::default())?;
        assert_eq!(report.records.len(), 1);
        let line = format_record(&report.records[0]);
        assert!(line.starts_with("moon square venus"));
        assert!(line.contains("moon=applying"));
        assert!(line.contains("rate=-10.757"));
        assert!(!line.contains("unsigned="));
        Ok(())
    }
}
