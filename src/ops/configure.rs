//! The configure pipeline.
//!
//! Settings are resolved and recorded first, then the build programs are
//! probed, the host is classified, submodules are prepared and every module
//! is configured. Only after all of that succeeds is the artifact committed,
//! so a fatal error never leaves a partial `config.mk` behind.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use crate::core::error::ConfigureError;
use crate::core::module::ModuleTable;
use crate::core::options::OptionModel;
use crate::core::platform::{CpuType, Platform};
use crate::core::store::ConfigurationStore;
use crate::ops::modules::{run_autoconf, FailurePolicy, ModuleConfigurator, ModuleReport};
use crate::ops::submodules::update_submodules;
use crate::toolchain::{
    self, check_local_rust, need_commands, select_c_compiler, CCompiler, ToolSpec, Toolchain,
};
use crate::util::config::load_module_table;
use crate::util::fs::{copy_if_changed, remove_file_if_exists, touch};
use crate::util::process::{display_command, ProcessRunner};
use crate::util::Shell;

/// Artifact consumed by the downstream build.
pub const CONFIG_MK: &str = "config.mk";
/// Scratch file the artifact is rendered into before being committed.
pub const CONFIG_TMP: &str = "config.tmp";
/// Touched on every successful run.
pub const CONFIG_STAMP: &str = "config.stamp";
/// Top-level makefile template in the source root.
pub const MAKEFILE_IN: &str = "Makefile.in";

/// Declare every option `configure` understands.
pub fn declare_options() -> Result<OptionModel, ConfigureError> {
    let mut model = OptionModel::new();
    model
        .declare_boolean("optimize", true, "build optimized rust code")?
        .declare_boolean("optimize-cxx", true, "build optimized C++ code")?
        .declare_boolean(
            "manage-submodules",
            true,
            "let the build manage the git submodules",
        )?
        .declare_boolean("debug", false, "build with debug assertions")?
        .declare_boolean("clang", false, "use clang instead of gcc")?
        .declare_boolean(
            "strict-submodules",
            false,
            "treat a failing module configure as fatal",
        )?
        .declare_valued("local-rust-root", "", "set prefix for local rust binary")?
        .declare_valued("prefix", "/usr/local", "set installation prefix")?;
    Ok(model)
}

/// Inputs to a configure run.
#[derive(Debug, Clone)]
pub struct ConfigureOptions {
    /// Raw arguments, exactly as given.
    pub args: Vec<String>,
    pub src_dir: PathBuf,
    pub build_dir: PathBuf,
    /// Name shown in the usage line.
    pub program: String,
    /// Module table to use instead of the one from `configure.toml`.
    pub module_table: Option<ModuleTable>,
}

impl ConfigureOptions {
    pub fn new(src_dir: impl Into<PathBuf>, build_dir: impl Into<PathBuf>) -> Self {
        ConfigureOptions {
            args: Vec::new(),
            src_dir: src_dir.into(),
            build_dir: build_dir.into(),
            program: "configure".to_string(),
            module_table: None,
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }
}

/// What a completed run did.
#[derive(Debug, Clone)]
pub struct ConfigureSummary {
    pub platform: Platform,
    pub cpu: CpuType,
    pub compiler: CCompiler,
    pub modules: Vec<ModuleReport>,
    /// Whether `config.mk` was rewritten.
    pub artifact_changed: bool,
}

#[derive(Debug, Clone)]
pub enum ConfigureOutcome {
    /// `--help` was given; nothing was touched.
    Help(String),
    Configured(ConfigureSummary),
}

/// Run the whole configure pipeline.
pub fn configure(
    opts: &ConfigureOptions,
    runner: &mut dyn ProcessRunner,
    shell: Arc<Shell>,
) -> Result<ConfigureOutcome> {
    let model = declare_options()?;
    if OptionModel::is_help_requested(&opts.args) {
        return Ok(ConfigureOutcome::Help(model.render_help(&opts.program)));
    }

    shell.step("looking for configure programs");
    need_commands(&*runner, toolchain::REQUIRED_COMMANDS)?;

    let src_dir = opts.src_dir.as_path();
    let build_dir = opts.build_dir.as_path();
    let table = match &opts.module_table {
        Some(table) => table.clone(),
        None => load_module_table(src_dir)?,
    };
    let tmp_path = build_dir.join(CONFIG_TMP);
    remove_file_if_exists(&tmp_path)?;

    let mut store = ConfigurationStore::new(Arc::clone(&shell));

    shell.step(format!("processing {} args", opts.program));
    let settings = model.resolve(&opts.args);
    settings.record(&mut store);

    shell.step("looking for build programs");
    let tools = Toolchain::probe_all(runner, &mut store)?;
    let compiler = select_c_compiler(
        settings.enabled("clang"),
        &tools.result(&toolchain::CLANG),
        &tools.result(&toolchain::GCC),
    )?;

    if let Some(local) = check_local_rust(settings.value("local-rust-root"), runner)? {
        shell.note(format!(
            "using rustc at: {} with version: {}",
            local.rustc.display(),
            local.version
        ));
    }

    let platform = Platform::detect(&uname(runner, "-s")?)?;
    let cpu = CpuType::detect(&uname(runner, "-m")?)?;
    tracing::debug!("host is {} on {}", platform, cpu);

    if settings.enabled("manage-submodules") {
        let git = required_path(&tools, &toolchain::GIT)?;
        update_submodules(runner, &shell, &git, src_dir)?;
    }

    let modules = table.module_set(platform);

    let autoconf = required_path(&tools, &toolchain::AUTOCONF213)?;
    run_autoconf(runner, &shell, &autoconf, src_dir, &modules)?;

    let policy = if settings.enabled("strict-submodules") {
        FailurePolicy::Fatal
    } else {
        FailurePolicy::Ignore
    };
    let reports = ModuleConfigurator::new(runner, &shell, src_dir, build_dir)
        .policy(policy)
        .configure_all(&modules)?;

    store.put("CFG_SRC_DIR", src_dir.display().to_string());
    store.put("CFG_BUILD_DIR", build_dir.display().to_string());
    store.put("CFG_OSTYPE", platform.tag());
    store.put("CFG_CPUTYPE", cpu.tag());
    store.put("CFG_CONFIGURE_ARGS", opts.args.join(" "));
    store.put("CFG_C_COMPILER", compiler.as_str());
    store.put(
        "CFG_SUBMODULES",
        modules
            .iter()
            .map(|m| m.name.as_str())
            .collect::<Vec<_>>()
            .join(" "),
    );

    let makefile_in = src_dir.join(MAKEFILE_IN);
    if makefile_in.is_file() {
        let makefile = build_dir.join("Makefile");
        if copy_if_changed(&makefile_in, &makefile)? {
            shell.note(format!("wrote {}", makefile.display()));
        }
    }

    let artifact_changed = store.commit(&tmp_path, &build_dir.join(CONFIG_MK))?;
    touch(&build_dir.join(CONFIG_STAMP))?;

    Ok(ConfigureOutcome::Configured(ConfigureSummary {
        platform,
        cpu,
        compiler,
        modules: reports,
        artifact_changed,
    }))
}

fn required_path(tools: &Toolchain, spec: &ToolSpec) -> Result<PathBuf, ConfigureError> {
    tools
        .result(spec)
        .path()
        .map(Path::to_path_buf)
        .ok_or_else(|| ConfigureError::ToolNotFound {
            logical_name: spec.var.to_string(),
            candidates: spec.candidates.iter().map(|c| c.to_string()).collect(),
        })
}

/// First line of `uname <flag>`, trimmed.
fn uname(runner: &mut dyn ProcessRunner, flag: &str) -> Result<String> {
    let uname = runner
        .find_on_path("uname")
        .ok_or_else(|| ConfigureError::MissingCommand("uname".to_string()))?;
    let args = [flag.to_string()];
    let output = runner.run_capturing_output(&uname, &args)?;
    if !output.success() {
        return Err(ConfigureError::StepFailed {
            step: display_command(&uname, &args),
            code: output.code,
        }
        .into());
    }
    Ok(output.stdout.lines().next().unwrap_or("").trim().to_string())
}
