use super::Input;

#[derive(clap::Args)]
pub struct Args {
    #[clap(flatten)]
    input: Input,
}

pub fn exec(cmd: Args) -> Result<(), Vec<miette::Report>> {
    let db = cmd.input.open()?;
    let _ = db.translate().map_err(|errs| db.pretty_errors(errs))?;
    println!("{} translated successfully!", cmd.input.path().display());
    Ok(())
}
