use crate::error::DomainError;
use crate::value_objects::Coords;

/// An explicit exit stored in a room's direction attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitTarget {
    /// `x,y,z` in the same area
    Local(Coords),
    /// `area name,x,y,z`
    Remote { area: String, coords: Coords },
    /// `!message`; the message is shown to whoever tries the exit
    Blocked(Option<String>),
}

impl ExitTarget {
    /// Parses an exit attribute value. Empty means "no explicit exit".
    pub fn parse(value: &str) -> Result<Option<Self>, DomainError> {
        if value.is_empty() {
            return Ok(None);
        }
        if let Some(message) = value.strip_prefix('!') {
            let message = (!message.is_empty()).then(|| message.to_string());
            return Ok(Some(Self::Blocked(message)));
        }

        match value.split(',').count() {
            3 => Ok(Some(Self::Local(value.parse()?))),
            4 => {
                let (area, coords) = value
                    .split_once(',')
                    .ok_or_else(|| DomainError::parse(format!("Malformed exit: {}", value)))?;
                Ok(Some(Self::Remote {
                    area: area.trim().to_string(),
                    coords: coords.parse()?,
                }))
            }
            _ => Err(DomainError::parse(format!("Malformed exit: {}", value))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_exit_form() {
        assert_eq!(ExitTarget::parse(""), Ok(None));
        assert_eq!(
            ExitTarget::parse("1,2,0"),
            Ok(Some(ExitTarget::Local(Coords::new(1, 2, 0))))
        );
        assert_eq!(
            ExitTarget::parse("Dark Forest,0,0,0"),
            Ok(Some(ExitTarget::Remote {
                area: "Dark Forest".to_string(),
                coords: Coords::new(0, 0, 0),
            }))
        );
        assert_eq!(
            ExitTarget::parse("!The gate is locked."),
            Ok(Some(ExitTarget::Blocked(Some("The gate is locked.".to_string()))))
        );
        assert_eq!(ExitTarget::parse("!"), Ok(Some(ExitTarget::Blocked(None))));
    }

    #[test]
    fn malformed_exit_is_an_error() {
        assert!(ExitTarget::parse("north-ish").is_err());
        assert!(ExitTarget::parse("a,b,c").is_err());
    }
}
