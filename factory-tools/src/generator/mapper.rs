use crate::emitter::FactoryStyle;
use crate::models::{ColumnKind, ModelIdentity};
use crate::quoting::php_string_array;

/// Placeholder for the faker receiver in the lookup tables.
const FAKER: &str = "{faker}";

/// Expressions for columns recognised by name. These win over the column type.
const FAKEABLE_NAMES: &[(&str, &str)] = &[
    ("address", "{faker}->address()"),
    ("address1", "{faker}->streetAddress()"),
    ("address2", "{faker}->secondaryAddress()"),
    ("city", "{faker}->city()"),
    ("company", "{faker}->company()"),
    ("country", "{faker}->country()"),
    ("country_code", "{faker}->countryCode()"),
    ("currency_code", "{faker}->currencyCode()"),
    ("description", "{faker}->text()"),
    ("email", "{faker}->safeEmail()"),
    ("first_name", "{faker}->firstName()"),
    ("firstname", "{faker}->firstName()"),
    ("guid", "{faker}->uuid()"),
    ("ip", "{faker}->ipv4()"),
    ("ip_address", "{faker}->ipv4()"),
    ("ipv4", "{faker}->ipv4()"),
    ("ipv6", "{faker}->ipv6()"),
    ("language_code", "{faker}->languageCode()"),
    ("last_name", "{faker}->lastName()"),
    ("lastname", "{faker}->lastName()"),
    ("lat", "{faker}->latitude()"),
    ("latitude", "{faker}->latitude()"),
    ("lng", "{faker}->longitude()"),
    ("locale", "{faker}->locale()"),
    ("longitude", "{faker}->longitude()"),
    ("mac_address", "{faker}->macAddress()"),
    ("md5", "{faker}->md5()"),
    ("name", "{faker}->name()"),
    ("password", "bcrypt({faker}->password())"),
    ("phone", "{faker}->phoneNumber()"),
    ("phone_number", "{faker}->phoneNumber()"),
    ("postal_code", "{faker}->postcode()"),
    ("postcode", "{faker}->postcode()"),
    ("remember_token", "{faker}->regexify('[A-Za-z0-9]{10}')"),
    ("sha1", "{faker}->sha1()"),
    ("sha256", "{faker}->sha256()"),
    ("slug", "{faker}->slug()"),
    ("street", "{faker}->streetName()"),
    ("summary", "{faker}->text()"),
    ("timezone", "{faker}->timezone()"),
    ("title", "{faker}->sentence()"),
    ("url", "{faker}->url()"),
    ("user_name", "{faker}->userName()"),
    ("username", "{faker}->userName()"),
    ("uuid", "{faker}->uuid()"),
    ("website", "{faker}->url()"),
    ("zip", "{faker}->postcode()"),
];

const FALLBACK: &str = "{faker}->word()";

fn fakeable_type(kind: &ColumnKind) -> Option<&'static str> {
    let expression = match kind {
        ColumnKind::String => "{faker}->word()",
        ColumnKind::Text => "{faker}->text()",
        ColumnKind::Date => "{faker}->date()",
        ColumnKind::Time => "{faker}->time()",
        ColumnKind::DateTime | ColumnKind::DateTimeTz => "{faker}->dateTime()",
        ColumnKind::Integer | ColumnKind::BigInt | ColumnKind::SmallInt | ColumnKind::TinyInt => {
            "{faker}->randomNumber()"
        }
        ColumnKind::Decimal | ColumnKind::Float => "{faker}->randomFloat()",
        ColumnKind::Boolean => "{faker}->boolean()",
        ColumnKind::Guid => "{faker}->uuid()",
        ColumnKind::Enum | ColumnKind::Other(_) => return None,
    };

    Some(expression)
}

/// Turns a column into the faker expression producing its values.
#[derive(Debug, Copy, Clone)]
pub struct GeneratorMapper {
    style: FactoryStyle,
}

impl GeneratorMapper {
    pub fn new(style: FactoryStyle) -> Self {
        Self { style }
    }

    pub fn faker(&self) -> &'static str {
        self.style.faker_receiver()
    }

    /// The expression for a column. Known enumeration values come first, then the column
    /// name, then the column kind, and a random word for anything else.
    ///
    /// Nullable columns get `null` half of the time.
    pub fn map_field(
        &self,
        field: &str,
        kind: &ColumnKind,
        is_nullable: bool,
        enum_values: Option<&[String]>,
    ) -> String {
        let faker = self.faker();

        let expression = match enum_values {
            Some(values) => format!("{faker}->randomElement({})", php_string_array(values)),
            None => FAKEABLE_NAMES
                .iter()
                .find(|(name, _)| *name == field)
                .map(|(_, expression)| *expression)
                .or_else(|| fakeable_type(kind))
                .unwrap_or(FALLBACK)
                .replace(FAKER, faker),
        };

        if is_nullable {
            format!("{faker}->boolean() ? {expression} : null")
        } else {
            expression
        }
    }

    /// An expression creating the related model through its own factory.
    pub fn relation_expression(&self, related: &ModelIdentity) -> String {
        match self.style {
            FactoryStyle::Class => format!(r"\{}::factory()", related.as_str()),
            FactoryStyle::Method => format!("factory({}::class)", related.as_str()),
        }
    }
}
