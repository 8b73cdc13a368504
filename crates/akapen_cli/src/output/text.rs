//! Text output formatter

use std::collections::HashMap;
use std::time::Duration;

use akapen_core::{DocumentCollection, ValidationError};

use super::{document_name, errors_of};

pub fn output_text(
    documents: &DocumentCollection,
    errors: &[ValidationError<'_>],
    timings: Option<&HashMap<String, Duration>>,
) {
    for document in documents.iter() {
        let name = document_name(document);
        for error in errors_of(document, errors) {
            println!(
                "{}:{}:{} {} [{}] {}",
                name,
                error.line_number,
                error.offset,
                error.severity,
                error.validator_name,
                error.message
            );
            if let Some(sentence) = error.sentence {
                println!("    {}", sentence.content.trim());
            }
        }
    }

    println!();
    println!(
        "Checked {} documents, found {} errors",
        documents.len(),
        errors.len()
    );

    if let Some(timings) = timings {
        output_timings(timings);
    }
}

fn output_timings(timings: &HashMap<String, Duration>) {
    if timings.is_empty() {
        return;
    }
    let total_duration: Duration = timings.values().sum();

    println!("\nPerformance Timings:");
    println!("{:<30} | {:<15} | {:<10}", "Validator", "Duration", "%");
    println!("{:-<30}-+-{:-<15}-+-{:-<10}", "", "", "");

    let mut sorted_timings: Vec<_> = timings.iter().collect();
    sorted_timings.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

    for (validator, duration) in sorted_timings {
        let percentage = if total_duration.as_secs_f64() > 0.0 {
            (duration.as_secs_f64() / total_duration.as_secs_f64()) * 100.0
        } else {
            0.0
        };
        println!("{:<30} | {:<15?} | {:<10.1}%", validator, duration, percentage);
    }
    println!("{:-<30}-+-{:-<15}-+-{:-<10}", "", "", "");
    println!("{:<30} | {:<15?}", "Total", total_duration);
}
