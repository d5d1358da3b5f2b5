//! Subcommand arguments and handlers

use std::path::PathBuf;

use color_eyre::eyre::{WrapErr, bail};
use episa_core::{
    AnalysisResults, Method, SamplerSettings, SamplingScheme, SensitivityAnalysisService,
    SnapshotWriter,
};

use crate::demo::run_demo;
use crate::problem_file::ProblemFile;
use crate::report::{ReportFormat, SampleReport, emit, render};
use crate::snapshot_yaml::YamlSnapshotWriter;

#[derive(Debug, Clone, clap::Args)]
pub struct RunArgs {
    /// YAML problem file with inputs, outputs and settings
    pub problem: PathBuf,

    /// Analysis method, overriding the file
    #[arg(short, long)]
    pub method: Option<Method>,

    /// Confidence level in (0, 1), overriding the file
    #[arg(long)]
    pub conf_level: Option<f64>,

    /// Skip second-order indices
    #[arg(long)]
    pub no_second_order: bool,

    /// Bootstrap seed, overriding the file
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write the results here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t)]
    pub format: ReportFormat,

    /// Folder to write the service snapshot into
    #[arg(long)]
    pub snapshot: Option<PathBuf>,
}

#[derive(Debug, Clone, clap::Args)]
pub struct SampleArgs {
    /// YAML problem file; only input names and bounds are read
    pub problem: PathBuf,

    #[arg(short, long)]
    pub scheme: SamplingScheme,

    /// Base sample count (trajectories for morris)
    #[arg(short = 'n', long = "samples", default_value_t = 1000)]
    pub n: usize,

    /// Saltelli samples without the second-order block
    #[arg(long)]
    pub no_second_order: bool,

    /// FAST interference parameter
    #[arg(long = "harmonics", default_value_t = 4)]
    pub m: usize,

    /// Morris grid levels
    #[arg(long, default_value_t = 4)]
    pub num_levels: usize,

    /// Morris grid jump
    #[arg(long, default_value_t = 2)]
    pub grid_jump: usize,

    /// Finite-difference step
    #[arg(long, default_value_t = 0.01)]
    pub delta: f64,

    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t)]
    pub format: ReportFormat,
}

#[derive(Debug, Clone, clap::Args)]
pub struct DemoArgs {
    /// Base sample count for every method
    #[arg(short = 'n', long = "samples", default_value_t = 1000)]
    pub n: usize,

    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

/// Build the service from the problem file and run it with the CLI overrides
pub fn analyze(args: &RunArgs) -> color_eyre::Result<(SensitivityAnalysisService, AnalysisResults)> {
    let file = ProblemFile::load(&args.problem)?;

    let mut config = file.service_config()?;
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    let mut service = SensitivityAnalysisService::new(
        &file.input_parameters(),
        &file.output_variables()?,
        config,
    )
    .wrap_err("inconsistent problem file")?;

    let mut request = file.run_request();
    if let Some(method) = args.method {
        // File options only fit the file's method family
        if request
            .options
            .as_ref()
            .is_some_and(|options| options.family() != method.family())
        {
            tracing::warn!(%method, "ignoring options from the problem file for another method");
            request.options = None;
        }
        request.method = Some(method);
    }
    request.conf_level = args.conf_level;
    if args.no_second_order {
        request.calc_second_order = Some(false);
    }

    let results = service.run(request).wrap_err("sensitivity analysis failed")?;
    Ok((service, results))
}

pub fn run(args: &RunArgs) -> color_eyre::Result<()> {
    let (service, results) = analyze(args)?;
    emit(&render(&results, args.format)?, args.output.as_deref())?;

    if let Some(folder) = &args.snapshot {
        YamlSnapshotWriter.write_snapshot(&service.snapshot(), folder, None)?;
    }
    Ok(())
}

pub fn sample(args: &SampleArgs) -> color_eyre::Result<()> {
    let problem = ProblemFile::load(&args.problem)?.problem()?;
    let settings = SamplerSettings {
        n: args.n,
        calc_second_order: !args.no_second_order,
        m: args.m,
        num_levels: args.num_levels,
        grid_jump: args.grid_jump,
        delta: args.delta,
        seed: args.seed,
    };

    let (samples, drawn_for) = args
        .scheme
        .generate(&problem, &settings)
        .wrap_err_with(|| format!("failed to generate {} samples", args.scheme))?;
    tracing::info!(scheme = %args.scheme, rows = samples.nrows(), "samples generated");

    let report = SampleReport::new(args.scheme.name(), &samples, &drawn_for);
    emit(&render(&report, args.format)?, args.output.as_deref())
}

pub fn demo(args: &DemoArgs) -> color_eyre::Result<()> {
    let report = run_demo(args.n, args.seed);
    println!("{report}");

    let failed = report.num_failed();
    if failed > 0 {
        bail!("{failed} method(s) failed");
    }
    Ok(())
}
