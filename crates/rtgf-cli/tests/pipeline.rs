//! End-to-end pipeline through the CLI handlers: snapshot → compile →
//! token assembly → evaluate, all through the filesystem.

use rtgf_cli::compile::CompileArgs;
use rtgf_cli::evaluate::EvaluateArgs;
use serde_json::json;

fn write_json(path: &std::path::Path, value: &serde_json::Value) {
    std::fs::write(path, serde_json::to_string_pretty(value).unwrap()).unwrap();
}

#[tokio::test]
async fn compile_then_evaluate_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot_path = dir.path().join("snapshot.json");
    let set_path = dir.path().join("predicate-set.json");
    let plan_path = dir.path().join("eval-plan.json");

    write_json(
        &snapshot_path,
        &json!({
            "jurisdiction": "EU",
            "domain": "PSD3",
            "required_predicates": ["pred.kyc_verified"],
            "predicates": [
                {
                    "id": "pred.kyc_verified",
                    "domain": "kyc",
                    "inputs": [
                        {"name": "customer.kyc_level", "type": "string", "required": true}
                    ],
                    "logic": {"op": "EQ", "var": "customer.kyc_level", "value": "FULL"},
                    "on_fail": {"decision": "DENY", "reason": "KYC_INCOMPLETE"}
                }
            ]
        }),
    );

    rtgf_cli::compile::run(&CompileArgs {
        snapshot: snapshot_path,
        out: set_path.clone(),
        plan_out: plan_path.clone(),
    })
    .unwrap();

    let predicate_set: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&set_path).unwrap()).unwrap();
    let eval_plan: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&plan_path).unwrap()).unwrap();
    assert_eq!(predicate_set["predicate_set_id"], "ps.EU.PSD3.v1");
    assert!(eval_plan["hash"].as_str().unwrap().starts_with("sha256:"));

    let token_path = dir.path().join("token.json");
    let context_path = dir.path().join("context.json");
    let result_path = dir.path().join("result.json");
    write_json(
        &token_path,
        &json!({
            "token_id": "IMT-EU.SG-PAYMENTS_AML-2025-10-22",
            "predicate_set": predicate_set,
            "eval_plan": eval_plan,
            "controls_on_permit": ["LOG:L2"]
        }),
    );
    write_json(&context_path, &json!({"customer": {"kyc_level": "FULL"}}));

    rtgf_cli::evaluate::run(&EvaluateArgs {
        token: token_path,
        context: context_path,
        at: Some("2025-01-01T00:00:00Z".to_string()),
        resolvers: vec![],
        out: Some(result_path.clone()),
    })
    .await
    .unwrap();

    let result: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&result_path).unwrap()).unwrap();
    assert_eq!(result["decision"], "PERMIT");
    assert_eq!(result["controls"], json!(["LOG:L2"]));
    assert_eq!(result["trace"]["ts"], "2025-01-01T00:00:00Z");
    assert!(result["digest"].as_str().unwrap().starts_with("sha256:"));

    // A second run under the same fixed instant writes identical bytes.
    let first_bytes = std::fs::read(&result_path).unwrap();
    let rerun_path = dir.path().join("result2.json");
    rtgf_cli::evaluate::run(&EvaluateArgs {
        token: dir.path().join("token.json"),
        context: dir.path().join("context.json"),
        at: Some("2025-01-01T00:00:00Z".to_string()),
        resolvers: vec![],
        out: Some(rerun_path.clone()),
    })
    .await
    .unwrap();
    assert_eq!(first_bytes, std::fs::read(&rerun_path).unwrap());
}

#[tokio::test]
async fn compile_failure_leaves_no_partial_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot_path = dir.path().join("snapshot.json");
    let set_path = dir.path().join("predicate-set.json");
    // An unwritable plan destination must not leave the predicate set
    // behind either.
    let plan_path = dir.path().join("no-such-dir").join("eval-plan.json");

    write_json(
        &snapshot_path,
        &json!({
            "jurisdiction": "EU",
            "domain": "PSD3",
            "required_predicates": ["pred.kyc_verified"],
            "predicates": [
                {
                    "id": "pred.kyc_verified",
                    "domain": "kyc",
                    "inputs": [
                        {"name": "customer.kyc_level", "type": "string", "required": true}
                    ],
                    "logic": {"op": "EQ", "var": "customer.kyc_level", "value": "FULL"},
                    "on_fail": {"decision": "DENY", "reason": "KYC_INCOMPLETE"}
                }
            ]
        }),
    );

    rtgf_cli::compile::run(&CompileArgs {
        snapshot: snapshot_path,
        out: set_path.clone(),
        plan_out: plan_path,
    })
    .unwrap_err();

    assert!(!set_path.exists());
}

#[tokio::test]
async fn evaluate_rejects_schema_invalid_token() {
    let dir = tempfile::tempdir().unwrap();
    let token_path = dir.path().join("token.json");
    let context_path = dir.path().join("context.json");
    // No token_id, no predicate_set.
    write_json(&token_path, &json!({"eval_plan": {}}));
    write_json(&context_path, &json!({}));

    let err = rtgf_cli::evaluate::run(&EvaluateArgs {
        token: token_path,
        context: context_path,
        at: None,
        resolvers: vec![],
        out: None,
    })
    .await
    .unwrap_err();
    assert!(err.to_string().contains("schema validation"));
}
