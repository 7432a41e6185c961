//! Object containers (BOC ... EOC) carrying foreign data objects such as
//! TIFF, JPEG or PDF pages.

use crate::ebcdic;
use crate::environment::ObjectEnvironmentGroup;
use crate::error::AfpError;
use crate::registry::ObjectType;
use crate::structured_field::{category, serialize, sf_type, Field, StructuredObject, MAX_PAYLOAD};
use crate::triplet::{object_class, ObjectClassification, Triplet, Triplets};
use std::io::Write;

#[derive(Debug)]
pub struct ObjectContainer {
    name: [u8; 8],
    triplets: Triplets,
    environment_group: Option<ObjectEnvironmentGroup>,
    data: Vec<u8>,
}

impl ObjectContainer {
    pub fn new(name: &str, object_type: ObjectType) -> Self {
        let mut triplets = Triplets::new();
        triplets.push(Triplet::ObjectClassification(Box::new(ObjectClassification::new(
            object_class::TIME_INVARIANT_PAGINATED_PRESENTATION,
            object_type,
        ))));
        Self { name: ebcdic::encode_name(name), triplets, environment_group: None, data: Vec::new() }
    }

    pub fn add_triplet(&mut self, triplet: Triplet) {
        self.triplets.push(triplet);
    }

    pub fn set_environment_group(&mut self, group: ObjectEnvironmentGroup) {
        self.environment_group = Some(group);
    }

    pub fn set_data(&mut self, data: Vec<u8>) {
        self.data = data;
    }
}

impl StructuredObject for ObjectContainer {
    fn write_start(&mut self, out: &mut dyn Write) -> Result<(), AfpError> {
        let mut field = Field::named(sf_type::BEGIN, category::OBJECT_CONTAINER, &self.name);
        field.put_triplets(&mut self.triplets)?;
        field.write_to(out)
    }

    fn write_content(&mut self, out: &mut dyn Write) -> Result<(), AfpError> {
        if let Some(group) = self.environment_group.as_mut() {
            serialize(group, out)?;
        }
        // Object container data records
        for chunk in self.data.chunks(MAX_PAYLOAD) {
            let mut field = Field::new(sf_type::DATA, category::OBJECT_CONTAINER);
            field.put(chunk);
            field.write_to(out)?;
        }
        Ok(())
    }

    fn write_end(&mut self, out: &mut dyn Write) -> Result<(), AfpError> {
        Field::named(sf_type::END, category::OBJECT_CONTAINER, &self.name).write_to(out)
    }
}
