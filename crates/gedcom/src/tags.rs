// GEDCOM 5.5 tags consulted by the parser and record accessors

pub const INDIVIDUAL: &str = "INDI";
pub const FAMILY: &str = "FAM";
pub const NAME: &str = "NAME";
pub const GIVEN_NAME: &str = "GIVN";
pub const SURNAME: &str = "SURN";
pub const SEX: &str = "SEX";
pub const BIRTH: &str = "BIRT";
pub const DEATH: &str = "DEAT";
pub const DATE: &str = "DATE";
pub const PLACE: &str = "PLAC";
pub const MARRIAGE: &str = "MARR";
pub const FAMILY_CHILD: &str = "FAMC";
pub const FAMILY_SPOUSE: &str = "FAMS";
pub const HUSBAND: &str = "HUSB";
pub const WIFE: &str = "WIFE";
pub const CHILD: &str = "CHIL";
pub const CONTINUED: &str = "CONT";
pub const CONCATENATION: &str = "CONC";
