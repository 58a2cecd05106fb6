//! Non-interactive commands: run one search (and optionally one letter) and
//! print the result.

use std::path::Path;

use anyhow::{anyhow, Result};
use colored::*;
use jobsearch_core::{controller, Job, JobId, JobSearchClient, JobSearchView, ResumeFile};

async fn run_search(client: &JobSearchClient, resume: &Path) -> Result<JobSearchView> {
    let file = ResumeFile::load(resume).await?;
    let mut view = JobSearchView::new();
    view.select_file(file);

    println!("🔍 Searching for jobs matching {}", resume.display().to_string().cyan());
    controller::search(&mut view, client).await?;

    if let Some(error) = view.error() {
        return Err(anyhow!("{}", error));
    }
    Ok(view)
}

fn print_job(index: usize, job: &Job) {
    println!(
        "{}. {} {}",
        index.to_string().bold().blue(),
        job.title.bold().yellow(),
        format!("[{}]", job.id).dimmed()
    );
    println!("   {} - {}", job.company.green(), job.location.dimmed());
    if let Some(degree) = &job.degree_requirements {
        println!("   {} {}", "Required:".blue(), degree);
    }
    println!("   {}\n", job.description);
}

pub async fn search(client: &JobSearchClient, resume: &Path) -> Result<()> {
    let view = run_search(client, resume).await?;

    if view.is_empty_result() {
        println!("{}", "No matching jobs found".red());
        println!("Try uploading a different resume or adjusting your search criteria.");
        return Ok(());
    }

    println!("\n{} matching jobs:\n", view.jobs().len().to_string().bold().green());
    for (i, job) in view.jobs().iter().enumerate() {
        print_job(i + 1, job);
    }

    Ok(())
}

pub async fn cover_letter(client: &JobSearchClient, resume: &Path, job: &str) -> Result<()> {
    let mut view = run_search(client, resume).await?;
    let job_id = JobId::new(job);

    let Some(found) = view.job(&job_id).cloned() else {
        return Err(anyhow!(
            "job {} is not among the {} matches for this resume",
            job,
            view.jobs().len()
        ));
    };

    println!(
        "✍️  Generating cover letter for {} at {}...\n",
        found.title.bold().yellow(),
        found.company.green()
    );
    controller::generate_cover_letter(&mut view, client, &job_id).await;

    match view.cover_letter(&job_id) {
        Some(letter) => {
            println!("{}", "Cover Letter".bold().green());
            println!("{}", "=".repeat(50).dimmed());
            println!("{}", letter);
            Ok(())
        }
        None => Err(anyhow!(
            "{}",
            view.error().unwrap_or("Failed to generate cover letter")
        )),
    }
}
