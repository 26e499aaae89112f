// Colored terminal output for the `check`, `score` and `smoke` commands.

use colored::Colorize;

use crate::format::ContractCheck;
use crate::models::ModerationResult;
use crate::toxicity::traits::ToxicityResult;

/// Display the verdict and explanation for one message.
pub fn display_result(text: &str, result: &ModerationResult) {
    println!("\n  Input: \"{}\"", super::truncate_chars(text, 120).dimmed());
    if result.is_safe {
        println!("  Verdict: {}", "safe".green().bold());
        return;
    }
    println!("  Verdict: {}", "toxic".red().bold());
    if let Some(explanation) = &result.explanation {
        println!("  Explanation: {}", explanation.text);
    }
}

/// Display the gate's view of one message: overall score, threshold and attributes.
pub fn display_score(text: &str, result: &ToxicityResult, threshold: f64, backend: &str) {
    println!("\n  Input: \"{}\"", super::truncate_chars(text, 120).dimmed());
    println!("  Backend: {backend}");

    let score = format!("{:.3}", result.toxicity);
    let colored_score = if result.toxicity > threshold {
        score.red().bold()
    } else {
        score.green()
    };
    println!("  Toxicity: {colored_score} (threshold {threshold:.2})");

    let attributes = result.attributes.present();
    if !attributes.is_empty() {
        println!("  Attributes:");
        for (label, value) in attributes {
            println!("    {label:<16} {value:.3}");
        }
    }
}

/// One line of the smoke run: the explanation plus whether it met the contract.
pub fn display_contract_check(explanation: &str, check: &ContractCheck) {
    println!("  Output: {explanation}");
    if check.is_compliant() {
        println!("  {} Format correct", "ok".green().bold());
    } else {
        let mut problems = Vec::new();
        if !check.has_lead_in {
            problems.push("missing \"It's\"");
        }
        if !check.has_connective {
            problems.push("second clause does not start with \"This\"");
        }
        if check.internal_boundaries != 1 {
            problems.push("wrong clause count");
        }
        println!(
            "  {} Format might be off: {}",
            "~".yellow(),
            problems.join(", ")
        );
    }
}
