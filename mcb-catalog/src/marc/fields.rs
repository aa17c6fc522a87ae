//! Field access over `mrrc` records
//!
//! `mrrc::Record` keeps control fields and data fields in tag-keyed maps in
//! record order. The helpers here cover what reconciliation needs on top of
//! that: positional edits to control fields, insertion in tag order, and
//! subfield lookups by a set of codes.

use mrrc::{Field, Record, Subfield};

/// Leader positions read or set during reconciliation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaderPosition {
    /// Leader/06
    RecordType,
    /// Leader/07
    BibliographicLevel,
    /// Leader/09
    CharacterCoding,
    /// Leader/17
    EncodingLevel,
    /// Leader/18
    CatalogingForm,
}

/// Build a data field from (code, value) pairs
pub fn build_field<I, S>(tag: &str, indicators: [char; 2], subfields: I) -> Field
where
    I: IntoIterator<Item = (char, S)>,
    S: Into<String>,
{
    let mut field = Field::new(tag.to_string(), indicators[0], indicators[1]);
    for (code, value) in subfields {
        field.add_subfield(code, value.into());
    }
    field
}

/// Control fields use tags 001-009
pub fn is_control_tag(tag: &str) -> bool {
    tag.len() == 3 && tag.starts_with("00")
}

/// Subfield lookups on a data field
pub trait FieldExt {
    /// Indicator pair
    fn indicator_pair(&self) -> [char; 2];

    /// First value for a subfield code
    fn first_value(&self, code: char) -> Option<&str>;

    /// Values of every subfield whose code is in `codes`, in field order
    fn values_in(&self, codes: &[char]) -> Vec<&str>;

    /// Replace the value of the first subfield with `code`
    fn replace_value(&mut self, code: char, value: &str) -> bool;

    /// `245 10 $aTitle :$bsubtitle` style rendering
    fn line(&self) -> String;
}

impl FieldExt for Field {
    fn indicator_pair(&self) -> [char; 2] {
        [self.indicator1, self.indicator2]
    }

    fn first_value(&self, code: char) -> Option<&str> {
        self.subfields
            .iter()
            .find(|sf| sf.code == code)
            .map(|sf| sf.value.as_str())
    }

    fn values_in(&self, codes: &[char]) -> Vec<&str> {
        self.subfields
            .iter()
            .filter(|sf| codes.contains(&sf.code))
            .map(|sf| sf.value.as_str())
            .collect()
    }

    fn replace_value(&mut self, code: char, value: &str) -> bool {
        match self.subfields.iter_mut().find(|sf| sf.code == code) {
            Some(sf) => {
                sf.value = value.to_string();
                true
            }
            None => false,
        }
    }

    fn line(&self) -> String {
        let subfields: String = self
            .subfields
            .iter()
            .map(|sf: &Subfield| format!("${}{}", sf.code, sf.value))
            .collect();
        format!(
            "{} {}{} {}",
            self.tag, self.indicator1, self.indicator2, subfields
        )
    }
}

/// Record-level helpers
pub trait RecordExt {
    fn leader_code(&self, position: LeaderPosition) -> char;

    fn set_leader_code(&mut self, position: LeaderPosition, code: char);

    /// Value of a control field
    fn control_value(&self, tag: &str) -> Option<&str>;

    /// Overwrite part of a control field starting at `offset`
    ///
    /// Short values are blank-padded first. Returns false when the field is
    /// absent.
    fn set_control_positions(&mut self, tag: &str, offset: usize, value: &str) -> bool;

    /// Every data field with `tag`, in record order
    fn data_fields(&self, tag: &str) -> &[Field];

    /// First data field with `tag`
    fn data_field(&self, tag: &str) -> Option<&Field> {
        self.data_fields(tag).first()
    }

    fn data_field_mut(&mut self, tag: &str) -> Option<&mut Field>;

    /// True when a control or data field carries one of `tags`
    fn has_any_tag(&self, tags: &[&str]) -> bool;

    /// Remove every field with `tag`, returning how many were removed
    fn drop_fields(&mut self, tag: &str) -> usize;

    /// Insert a data field before the first greater tag
    ///
    /// Equal tags keep insertion order.
    fn insert_in_tag_order(&mut self, field: Field);

    /// Tags of every field in record order, control fields first
    fn tags(&self) -> Vec<&str>;

    /// Every field rendered as one line, in record order
    fn field_lines(&self) -> Vec<String>;

    /// Control number (001) as stored
    fn control_number(&self) -> Option<&str> {
        self.control_value("001")
    }

    /// 245 $a and $b joined for display
    fn title_statement(&self) -> Option<String> {
        let parts = self.data_field("245")?.values_in(&['a', 'b']);
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}

impl RecordExt for Record {
    fn leader_code(&self, position: LeaderPosition) -> char {
        let leader = &self.leader;
        match position {
            LeaderPosition::RecordType => leader.record_type,
            LeaderPosition::BibliographicLevel => leader.bibliographic_level,
            LeaderPosition::CharacterCoding => leader.character_coding,
            LeaderPosition::EncodingLevel => leader.encoding_level,
            LeaderPosition::CatalogingForm => leader.cataloging_form,
        }
    }

    fn set_leader_code(&mut self, position: LeaderPosition, code: char) {
        let leader = &mut self.leader;
        let slot = match position {
            LeaderPosition::RecordType => &mut leader.record_type,
            LeaderPosition::BibliographicLevel => &mut leader.bibliographic_level,
            LeaderPosition::CharacterCoding => &mut leader.character_coding,
            LeaderPosition::EncodingLevel => &mut leader.encoding_level,
            LeaderPosition::CatalogingForm => &mut leader.cataloging_form,
        };
        *slot = if code.is_ascii() { code } else { ' ' };
    }

    fn control_value(&self, tag: &str) -> Option<&str> {
        self.control_fields.get(tag).map(String::as_str)
    }

    fn set_control_positions(&mut self, tag: &str, offset: usize, value: &str) -> bool {
        let Some(data) = self.control_fields.get_mut(tag) else {
            return false;
        };
        let mut chars: Vec<char> = data.chars().collect();
        let end = offset + value.chars().count();
        if chars.len() < end {
            chars.resize(end, ' ');
        }
        for (slot, c) in chars[offset..end].iter_mut().zip(value.chars()) {
            *slot = c;
        }
        *data = chars.into_iter().collect();
        true
    }

    fn data_fields(&self, tag: &str) -> &[Field] {
        self.fields.get(tag).map(|fields| fields.as_slice()).unwrap_or(&[])
    }

    fn data_field_mut(&mut self, tag: &str) -> Option<&mut Field> {
        self.fields.get_mut(tag).and_then(|fields| fields.first_mut())
    }

    fn has_any_tag(&self, tags: &[&str]) -> bool {
        tags.iter().any(|tag| {
            self.control_fields.contains_key(*tag) || !self.data_fields(tag).is_empty()
        })
    }

    fn drop_fields(&mut self, tag: &str) -> usize {
        if is_control_tag(tag) {
            return usize::from(self.control_fields.shift_remove(tag).is_some());
        }
        self.fields.shift_remove(tag).map_or(0, |fields| fields.len())
    }

    fn insert_in_tag_order(&mut self, field: Field) {
        if let Some(group) = self.fields.get_mut(field.tag.as_str()) {
            group.push(field);
            return;
        }
        let mut groups: Vec<(String, Vec<Field>)> = self.fields.drain(..).collect();
        let position = groups
            .iter()
            .position(|(tag, _)| tag.as_str() > field.tag.as_str())
            .unwrap_or(groups.len());
        groups.insert(position, (field.tag.clone(), vec![field]));
        self.fields.extend(groups);
    }

    fn tags(&self) -> Vec<&str> {
        let control = self.control_fields.keys().map(String::as_str);
        let data = self
            .fields
            .iter()
            .flat_map(|(tag, fields)| fields.iter().map(move |_| tag.as_str()));
        control.chain(data).collect()
    }

    fn field_lines(&self) -> Vec<String> {
        let control = self
            .control_fields
            .iter()
            .map(|(tag, value)| format!("{} {}", tag, value));
        let data = self.fields.values().flatten().map(FieldExt::line);
        control.chain(data).collect()
    }
}
