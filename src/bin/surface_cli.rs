#[cfg(target_arch = "wasm32")]
fn main() {
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    if let Err(err) = native::run() {
        eprintln!("surface_cli error: {err}");
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::fmt::Write as _;
    use std::fs::{self, File};
    use std::io::{BufWriter, Write};
    use std::path::{Path, PathBuf};

    use surface_engine::color::palette_names;
    use surface_engine::surface::{
        Domain, Interval, Resolution, SurfaceCatalog, SurfaceKind, SurfaceRequest,
    };
    use surface_engine::{EngineConfig, GeneratedSurface, generate};

    const SNAPSHOT_QUANTIZE: f64 = 1e-6;
    const SNAPSHOT_DECIMALS: usize = 6;

    const USAGE: &str = r#"surface_cli (surface-engine)

USAGE:
  surface_cli list
  surface_cli describe <kind>
  surface_cli palettes
  surface_cli run <kind> [options]

KINDS:
  mobius_strip, klein_bottle, torus, sphere, parametric, explicit

OPTIONS (run):
  --u-res <n>             Samples along u (or x), default from config
  --v-res <n>             Samples along v (or y), default from config
  --param <name=value>    Family parameter, e.g. R=3 (repeatable)
  --expr <text>           Expression in x(u,v), y(u,v), z(u,v) order (repeatable)
  --domain <a,b,c,d>      u range [a, b] and v range [c, d] for custom surfaces
  --palette <name>        Color palette, default from config
  --config <path>         JSON engine configuration
  --obj <path>            Write OBJ with vertex colors
  --snap <path>           Write snapshot instead of printing it
  --overwrite             Overwrite existing output files
  -h, --help              Show this help
"#;

    pub fn run() -> Result<(), String> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let mut args = Args::new(args);

        let Some(command) = args.next() else {
            print_usage();
            return Ok(());
        };

        match command.as_str() {
            "list" => {
                print_kinds();
                Ok(())
            }
            "describe" => cmd_describe(&mut args),
            "palettes" => {
                for name in palette_names() {
                    println!("{name}");
                }
                Ok(())
            }
            "run" => cmd_run(&mut args),
            "-h" | "--help" | "help" => {
                print_usage();
                Ok(())
            }
            other => Err(format!("unknown command `{other}`\n\n{USAGE}")),
        }
    }

    fn print_usage() {
        println!("{USAGE}");
    }

    fn print_kinds() {
        for kind in SurfaceCatalog::list_kinds() {
            println!("{:<14} {}", kind.id(), kind.title());
        }
    }

    fn cmd_describe(args: &mut Args) -> Result<(), String> {
        let kind = parse_kind(&args.value("describe")?)?;
        let description = SurfaceCatalog::describe(kind);

        println!("{}", description.title);
        println!("{}", description.summary);
        println!();
        for equation in description.equations {
            println!("  {equation}");
        }
        println!("  {}", description.domain);
        for param in description.parameters {
            println!(
                "param {} ({}): default {} in [{}, {}], {}",
                param.name,
                param.label,
                param.default,
                param.min,
                param.max,
                param.constraint.describe()
            );
        }
        for property in description.properties {
            println!("- {property}");
        }
        Ok(())
    }

    fn cmd_run(args: &mut Args) -> Result<(), String> {
        let kind = parse_kind(&args.value("run")?)?;

        let mut u_res: Option<usize> = None;
        let mut v_res: Option<usize> = None;
        let mut params: Vec<(String, f64)> = Vec::new();
        let mut expressions: Vec<String> = Vec::new();
        let mut domain: Option<Domain> = None;
        let mut palette: Option<String> = None;
        let mut config_path: Option<PathBuf> = None;
        let mut obj_path: Option<PathBuf> = None;
        let mut snap_path: Option<PathBuf> = None;
        let mut overwrite = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--u-res" => u_res = Some(parse_count("--u-res", &args.value("--u-res")?)?),
                "--v-res" => v_res = Some(parse_count("--v-res", &args.value("--v-res")?)?),
                "--param" => params.push(parse_param(&args.value("--param")?)?),
                "--expr" => expressions.push(args.value("--expr")?),
                "--domain" => domain = Some(parse_domain(&args.value("--domain")?)?),
                "--palette" => palette = Some(args.value("--palette")?),
                "--config" => config_path = Some(PathBuf::from(args.value("--config")?)),
                "--obj" => obj_path = Some(PathBuf::from(args.value("--obj")?)),
                "--snap" => snap_path = Some(PathBuf::from(args.value("--snap")?)),
                "--overwrite" => overwrite = true,
                "-h" | "--help" => {
                    print_usage();
                    return Ok(());
                }
                other => return Err(format!("unknown option `{other}`\n\n{USAGE}")),
            }
        }

        let config = match config_path.as_deref() {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .map_err(|e| format!("read {}: {e}", path.display()))?;
                EngineConfig::from_json_str(&text).map_err(|e| e.to_string())?
            }
            None => EngineConfig::default(),
        };

        let resolution = Resolution::new(
            u_res.unwrap_or(config.defaults.resolution.u),
            v_res.unwrap_or(config.defaults.resolution.v),
        );
        let mut request = if expressions.is_empty() {
            SurfaceRequest::with_defaults(kind, resolution)
        } else {
            SurfaceRequest::new(kind, resolution).with_expressions(expressions)
        };
        if let Some(domain) = domain {
            request = request.with_domain(domain);
        }
        for (name, value) in &params {
            request = request.with_param(name, *value);
        }

        let palette = palette.unwrap_or_else(|| config.defaults.palette.clone());
        let surface = generate(&request, &palette, &config).map_err(|e| e.to_string())?;
        let snapshot = snapshot(&surface);

        if let Some(path) = snap_path.as_deref() {
            write_text_file(path, &snapshot, overwrite)?;
            eprintln!("wrote {}", path.display());
        } else {
            print!("{snapshot}");
        }

        if let Some(path) = obj_path.as_deref() {
            write_obj_file(path, &surface, overwrite)?;
            eprintln!("wrote {}", path.display());
        }

        let mesh = &surface.mesh;
        eprintln!(
            "{}: vertices={} triangles={} non_finite={}",
            kind.id(),
            mesh.vertex_count(),
            mesh.triangle_indices().len() / 3,
            mesh.non_finite_count()
        );

        Ok(())
    }

    fn parse_kind(text: &str) -> Result<SurfaceKind, String> {
        text.parse::<SurfaceKind>().map_err(|e| e.to_string())
    }

    fn parse_count(flag: &str, text: &str) -> Result<usize, String> {
        text.trim()
            .parse()
            .map_err(|_| format!("{flag} expects a whole number, got `{text}`"))
    }

    fn parse_param(text: &str) -> Result<(String, f64), String> {
        let (name, value) = text
            .split_once('=')
            .ok_or_else(|| format!("--param expects name=value, got `{text}`"))?;
        let value: f64 = value
            .trim()
            .parse()
            .map_err(|_| format!("parameter `{name}` has a non-numeric value `{value}`"))?;
        Ok((name.trim().to_owned(), value))
    }

    fn parse_domain(text: &str) -> Result<Domain, String> {
        let bounds: Vec<f64> = text
            .split(',')
            .map(|part| part.trim().parse::<f64>())
            .collect::<Result<_, _>>()
            .map_err(|_| format!("--domain expects four numbers a,b,c,d, got `{text}`"))?;
        match bounds.as_slice() {
            [a, b, c, d] => Ok(Domain::new(Interval::new(*a, *b), Interval::new(*c, *d))),
            _ => Err(format!("--domain expects four numbers a,b,c,d, got `{text}`")),
        }
    }

    fn snapshot(surface: &GeneratedSurface) -> String {
        let mesh = &surface.mesh;
        let colors = &surface.colors;
        let (rows, columns) = mesh.shape();
        let mut out = String::new();

        let _ = writeln!(out, "surface {}", mesh.kind().id());
        let _ = writeln!(out, "title {}", mesh.title());
        let _ = writeln!(out, "shape {rows} {columns}");
        let _ = writeln!(out, "palette {}", colors.palette());
        let _ = writeln!(out, "flat {}", colors.is_flat());
        let _ = writeln!(out, "fallback_count {}", colors.fallback_count());
        let _ = writeln!(out, "non_finite_count {}", mesh.non_finite_count());

        match colors.z_range() {
            Some((min, max)) => {
                out.push_str("z_range ");
                write_f64(&mut out, min);
                out.push(' ');
                write_f64(&mut out, max);
                out.push('\n');
            }
            None => out.push_str("z_range none\n"),
        }

        if let Some(bounds) = surface.bounds {
            write_vec2_line(&mut out, "bounds.x", bounds.x);
            write_vec2_line(&mut out, "bounds.y", bounds.y);
            write_vec2_line(&mut out, "bounds.z", bounds.z);
        }

        let intensities = colors.intensities().values();
        for (idx, point) in mesh.vertices().into_iter().enumerate() {
            let _ = write!(out, "v.{idx} ");
            write_f64(&mut out, point[0]);
            out.push(' ');
            write_f64(&mut out, point[1]);
            out.push(' ');
            write_f64(&mut out, point[2]);
            out.push_str(" t ");
            write_f64(&mut out, intensities.get(idx).copied().unwrap_or(f64::NAN));
            out.push('\n');
        }

        out
    }

    fn write_text_file(path: &Path, text: &str, overwrite: bool) -> Result<(), String> {
        if path.exists() && !overwrite {
            return Err(format!(
                "refusing to overwrite existing file {} (use --overwrite)",
                path.display()
            ));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| format!("create dir {}: {e}", parent.display()))?;
        }
        fs::write(path, normalize_snapshot_text(text)).map_err(|e| format!("write {}: {e}", path.display()))
    }

    /// Non-finite vertices are left out and face indices renumbered around them.
    fn write_obj_file(path: &Path, surface: &GeneratedSurface, overwrite: bool) -> Result<(), String> {
        if path.exists() && !overwrite {
            return Err(format!(
                "refusing to overwrite existing file {} (use --overwrite)",
                path.display()
            ));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| format!("create dir {}: {e}", parent.display()))?;
        }

        let file = File::create(path).map_err(|e| format!("create {}: {e}", path.display()))?;
        let mut w = BufWriter::new(file);

        let mesh = &surface.mesh;
        let colors = surface.colors.colors();
        writeln!(w, "# surface-engine surface_cli").map_err(|e| format!("write obj: {e}"))?;
        writeln!(w, "o {}", mesh.kind().id()).map_err(|e| format!("write obj: {e}"))?;

        let mut remap: Vec<Option<usize>> = Vec::with_capacity(mesh.vertex_count());
        let mut next = 1;
        for (idx, p) in mesh.vertices().into_iter().enumerate() {
            if !p.iter().all(|value| value.is_finite()) {
                remap.push(None);
                continue;
            }
            match colors.and_then(|colors| colors.get(idx)) {
                Some(c) => writeln!(w, "v {} {} {} {} {} {}", p[0], p[1], p[2], c.r, c.g, c.b),
                None => writeln!(w, "v {} {} {}", p[0], p[1], p[2]),
            }
            .map_err(|e| format!("write obj: {e}"))?;
            remap.push(Some(next));
            next += 1;
        }

        let indices = mesh.triangle_indices();
        for tri in indices.chunks_exact(3) {
            let mut face = [0_usize; 3];
            for (slot, index) in face.iter_mut().zip(tri) {
                *slot = remap
                    .get(*index as usize)
                    .copied()
                    .flatten()
                    .ok_or_else(|| format!("face references dropped vertex {index}"))?;
            }
            let [a, b, c] = face;
            writeln!(w, "f {a} {b} {c}").map_err(|e| format!("write obj: {e}"))?;
        }

        w.flush().map_err(|e| format!("flush {}: {e}", path.display()))
    }

    fn normalize_snapshot_text(text: &str) -> String {
        let normalized = text.replace("\r\n", "\n");
        if normalized.ends_with('\n') {
            normalized
        } else {
            format!("{normalized}\n")
        }
    }

    fn quantize_f64(value: f64) -> f64 {
        if !value.is_finite() {
            return value;
        }
        let value = if value == -0.0 { 0.0 } else { value };
        let q = (value / SNAPSHOT_QUANTIZE).round() * SNAPSHOT_QUANTIZE;
        if q == -0.0 { 0.0 } else { q }
    }

    fn write_f64(out: &mut String, value: f64) {
        let value = quantize_f64(value);
        let _ = write!(out, "{value:.SNAPSHOT_DECIMALS$}");
    }

    fn write_vec2_line(out: &mut String, prefix: &str, v: [f64; 2]) {
        let _ = write!(out, "{prefix} ");
        write_f64(out, v[0]);
        out.push(' ');
        write_f64(out, v[1]);
        out.push('\n');
    }

    struct Args {
        args: Vec<String>,
        pos: usize,
    }

    impl Args {
        fn new(args: Vec<String>) -> Self {
            Self { args, pos: 0 }
        }

        fn next(&mut self) -> Option<String> {
            let arg = self.args.get(self.pos)?.clone();
            self.pos += 1;
            Some(arg)
        }

        fn value(&mut self, flag: &str) -> Result<String, String> {
            self.next()
                .ok_or_else(|| format!("missing value for {flag}"))
        }
    }
}
