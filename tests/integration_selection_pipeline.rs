/*
Scope
-----
End-to-end batch run: synthesize a long-format score table with known
Gaussian dependence, sweep two viable conditions plus one with no data,
and check records, manifest, goodness-of-fit fields, aggregation, and
determinism of the whole pipeline.
*/
use copula_select::copula::{simulate, CopulaFamily};
use copula_select::data::{ConditionSpec, LongTable};
use copula_select::optimization::mple::MpleOptions;
use copula_select::pipeline::{
    run_batch, BatchDataset, BatchOutput, PipelineConfig, TransformKind,
};
use copula_select::select::DecisionKind;

const N_STUDENTS: usize = 300;

/// Three observations per student: grade 3 (2015), grade 4 (2016), and
/// grade 5 (2017) math. Grades 3 and 5 share a rho = 0.7 Gaussian copula;
/// grade 4 is tied to grade 5 through the same latent draw.
fn synthetic_table() -> LongTable {
    let (u, v) = simulate(CopulaFamily::Gaussian, &[0.7], N_STUDENTS, 2015).unwrap();
    let mut student_id = Vec::new();
    let mut grade = Vec::new();
    let mut year = Vec::new();
    let mut content_area = Vec::new();
    let mut scale_score = Vec::new();
    for i in 0..N_STUDENTS {
        let sid = format!("s{i:04}");
        for (g, y, score) in [
            (3u8, 2015, 400.0 + 150.0 * u[i]),
            (4u8, 2016, 410.0 + 155.0 * (0.5 * u[i] + 0.5 * v[i])),
            (5u8, 2017, 420.0 + 160.0 * v[i]),
        ] {
            student_id.push(sid.clone());
            grade.push(g);
            year.push(y);
            content_area.push("math".to_owned());
            scale_score.push(score);
        }
    }
    LongTable::new(student_id, grade, year, content_area, scale_score).unwrap()
}

fn condition(grade_prior: u8, grade_current: u8, year_prior: i32) -> ConditionSpec {
    ConditionSpec {
        grade_prior,
        grade_current,
        year_prior,
        content_prior: "math".into(),
        content_current: "math".into(),
    }
}

fn batch() -> Vec<BatchDataset> {
    vec![BatchDataset {
        dataset_id: "district_a".into(),
        table: synthetic_table(),
        conditions: vec![
            condition(3, 5, 2015),
            condition(4, 5, 2016),
            // No grade 7 rows exist; this unit must degrade gracefully.
            condition(6, 7, 2016),
        ],
    }]
}

fn config(n_gof_bootstrap: usize) -> PipelineConfig {
    config_with(TransformKind::Ranks, n_gof_bootstrap)
}

fn config_with(transform: TransformKind, n_gof_bootstrap: usize) -> PipelineConfig {
    PipelineConfig::new(
        vec![
            CopulaFamily::Gaussian,
            CopulaFamily::Clayton,
            CopulaFamily::Frank,
            CopulaFamily::Comonotonic,
        ],
        transform,
        n_gof_bootstrap,
        7,
        Some(100),
        MpleOptions::default(),
    )
    .unwrap()
}

#[test]
// Purpose: the batch produces one record per (viable condition, family),
// routes the empty condition into the manifest, and reaches a decision.
fn batch_produces_records_manifest_and_decision() {
    let output = run_batch(&batch(), &config(0)).unwrap();

    // 2 viable conditions x 4 families.
    assert_eq!(output.records.len(), 8);
    assert_eq!(output.manifest.succeeded.len(), 2);
    assert_eq!(output.manifest.insufficient.len(), 1);
    assert_eq!(output.manifest.insufficient[0].n_pairs, 0);
    assert!(output.manifest.fit_failures.is_empty());

    let agg = output.aggregation.expect("records exist, aggregation must run");
    assert_eq!(agg.summaries.len(), 2);
    assert!(agg.summaries.iter().all(|s| s.best_aic != CopulaFamily::Comonotonic));
    // Weights normalize within each condition.
    for summary in &agg.summaries {
        let total: f64 = summary.aic_weights.iter().map(|&(_, w)| w).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }
    assert!(matches!(
        agg.decision.kind,
        DecisionKind::SingleWinner
            | DecisionKind::TwoContenders
            | DecisionKind::ContextDependent
            | DecisionKind::NoClearWinner
    ));
    assert!(!agg.decision.winning_families.is_empty());
}

#[test]
// Purpose: the grade 3 -> 5 condition, generated from a Gaussian copula,
// crowns Gaussian on AIC with a dependence estimate near the truth.
fn gaussian_condition_recovers_generating_family() {
    let output = run_batch(&batch(), &config(0)).unwrap();
    let agg = output.aggregation.unwrap();
    let g3_to_g5 = agg
        .summaries
        .iter()
        .find(|s| s.condition_id.starts_with("g3_"))
        .expect("grade 3 condition summary");
    assert_eq!(g3_to_g5.best_aic, CopulaFamily::Gaussian);

    let winner = output
        .records
        .iter()
        .find(|r| r.condition_id == g3_to_g5.condition_id && r.family == CopulaFamily::Gaussian)
        .unwrap();
    let rho = winner.parameter_1.unwrap();
    assert!((rho - 0.7).abs() < 0.1, "rho_hat = {rho}");
    assert_eq!(winner.n_pairs, N_STUDENTS);
    assert_eq!(winner.year_span, 2);
}

#[test]
// Purpose: a flexible Bernstein margin transform agrees with the rank
// transform on the generating family and its dependence strength, and
// the margins it produces stay close enough to uniform not to flip the
// verdict.
fn bernstein_transform_agrees_with_rank_winner() {
    let rank_out = run_batch(&batch(), &config(0)).unwrap();
    let smooth_out =
        run_batch(&batch(), &config_with(TransformKind::Bernstein { degree: 40 }, 0)).unwrap();

    let g3_winner = |out: &BatchOutput| {
        out.aggregation
            .as_ref()
            .unwrap()
            .summaries
            .iter()
            .find(|s| s.condition_id.starts_with("g3_"))
            .expect("grade 3 condition summary")
            .best_aic
    };
    assert_eq!(g3_winner(&smooth_out), g3_winner(&rank_out));
    assert_eq!(g3_winner(&smooth_out), CopulaFamily::Gaussian);

    let rho = smooth_out
        .records
        .iter()
        .find(|r| r.condition_id.starts_with("g3_") && r.family == CopulaFamily::Gaussian)
        .unwrap()
        .parameter_1
        .unwrap();
    assert!((rho - 0.7).abs() < 0.15, "rho_hat = {rho}");
}

#[test]
// Purpose: enabling the bootstrap fills goodness-of-fit fields for the
// parametric families and leaves the comonotonic ones statistic-only.
fn gof_fields_populate_when_enabled() {
    let output = run_batch(&batch(), &config(5)).unwrap();
    for record in &output.records {
        assert!(record.gof_statistic.is_some(), "{}: missing statistic", record.family);
        if record.family == CopulaFamily::Comonotonic {
            assert!(record.gof_pvalue.is_none());
        } else {
            assert!(record.gof_pvalue.is_some(), "{}: missing p-value", record.family);
        }
    }
}

#[test]
// Purpose: identical configs give byte-identical outputs across runs,
// regardless of rayon scheduling.
fn batch_is_deterministic() {
    let a = run_batch(&batch(), &config(3)).unwrap();
    let b = run_batch(&batch(), &config(3)).unwrap();
    assert_eq!(a.records, b.records);
    assert_eq!(a.manifest, b.manifest);
    assert_eq!(a.aggregation.unwrap().decision, b.aggregation.unwrap().decision);
}

#[test]
// Purpose: the whole output surface serializes to JSON.
fn outputs_serialize() {
    let output = run_batch(&batch(), &config(0)).unwrap();
    let records_json = serde_json::to_string(&output.records).unwrap();
    assert!(records_json.contains("\"family\":\"gaussian\""));
    assert!(serde_json::to_string(&output.manifest).is_ok());
    assert!(serde_json::to_string(&output.aggregation.unwrap()).is_ok());
}
