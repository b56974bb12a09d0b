pub mod args;
pub mod error;
pub mod ext;
pub mod image;
pub mod tga;
pub mod utils;

use image::Image;

pub fn export(input: &str, output: &str) -> anyhow::Result<()> {
    let image = Image::read_from_file(input)?;
    eprintln!("Image metadata: {:?}", image);
    utils::make_sure_dir_exists(output)?;
    image.export_png(output)?;
    Ok(())
}

pub fn import(input: &str, output: &str, compress: bool) -> anyhow::Result<()> {
    let image = Image::import_png(input)?;
    eprintln!("Image metadata: {:?}", image);
    utils::make_sure_dir_exists(output)?;
    image.write_to_file(output, compress)?;
    Ok(())
}

pub fn auto(input: &str, compress: bool) -> anyhow::Result<()> {
    let pb = std::path::PathBuf::from(input);
    let ext = pb
        .extension()
        .unwrap_or(std::ffi::OsStr::new(""))
        .to_ascii_lowercase();
    if ext == "tga" {
        let image = Image::read_from_file(&pb)?;
        eprintln!("Image metadata: {:?}", image);
        image.export_png(&pb.with_extension("png"))?;
    } else if ext == "png" {
        let image = Image::import_png(&pb)?;
        eprintln!("Image metadata: {:?}", image);
        image.write_to_file(&pb.with_extension("tga"), compress)?;
    } else {
        return Err(anyhow::anyhow!(
            "Unrecognized file extension: {}",
            pb.display()
        ));
    }
    eprintln!("Auto operation completed successfully.");
    Ok(())
}

fn main() {
    let args = args::Arg::parse();
    unsafe { std::env::set_var("RUST_LIB_BACKTRACE", "1") };
    let result = match args.command.as_ref() {
        Some(args::Command::Export { input, output }) => export(input, output),
        Some(args::Command::Import {
            input,
            output,
            compress,
        }) => import(input, output, *compress),
        None => match args.auto.as_ref() {
            Some(auto_args) => auto(&auto_args.input, auto_args.compress),
            None => Ok(()),
        },
    };
    if let Err(e) = result {
        eprintln!("Error: {}", e);
        eprintln!("Backtrace: {}", e.backtrace());
        eprintln!("Press Enter to exit program.");
        let mut s = String::new();
        let _ = std::io::stdin().read_line(&mut s);
        std::process::exit(1);
    }
}
