use crate::{
    args::Show,
    eeprom::{self, EepromError},
};

#[tracing::instrument]
pub fn show(opts: Show) -> Result<(), EepromError> {
    let fru = eeprom::decode(&opts.eeprom)?;
    print!("{}", fru);
    Ok(())
}
