use std::env;

use anyhow::Context;
use coursebook::api::{course_details, ApiClient};
use coursebook::content::{ContentBlock, Locale};

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

pub struct CliArgs {
    pub course_id: String,
    pub locale: Locale,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> anyhow::Result<CliArgs> {
    let course_id = args.next().context("course_id is required")?;
    let locale = match args.next().as_deref() {
        Some("ar") => Locale::Ar,
        Some("fr") => Locale::Fr,
        _ => Locale::En,
    };

    Ok(CliArgs { course_id, locale })
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let args = match parse_args(env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Usage: cargo run --bin fetch_course <course_id> [en|ar|fr]");
            return Err(e);
        }
    };

    let config = coursebook::config::Config::from_env();
    let client = ApiClient::new(&config);

    let course = course_details(&client, &args.course_id)
        .with_context(|| format!("could not fetch course '{}'", args.course_id))?;

    println!("{BOLD}{}{RESET} [{:?}]", course.title, course.difficulty);
    if let Some(description) = &course.description {
        println!("{}", description);
    }
    if !course.tags.is_empty() {
        println!("tags: {}", course.tags.join(", "));
    }
    println!();

    for module in &course.modules {
        println!("{BOLD}{}{RESET}", module.title.get(args.locale));
        for section in &module.sections {
            let paragraphs = section
                .blocks
                .iter()
                .filter(|b| matches!(b, ContentBlock::Paragraph { .. }))
                .count();
            let media = section.blocks.len() - paragraphs;
            println!(
                "  {} ({} paragraphs, {} media, {} questions)",
                section.title.get(args.locale),
                paragraphs,
                media,
                section.questions.len()
            );
        }
    }

    match &course.final_exam {
        Some(exam) => println!("\nfinal exam: {} questions", exam.len()),
        None => println!("\nno final exam"),
    }

    Ok(())
}
