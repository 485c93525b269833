mod args;
mod eeprom;
mod fru;
mod hex;
mod inventory;
mod logging;
mod publish;
mod run;
mod show;
mod stage;

fn main() -> Result<(), String> {
    let args: args::TopLevel = argh::from_env();
    logging::init(args.verbose);
    run::run(args.invocation)
}
