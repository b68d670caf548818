use crate::areas::repository::Repository;
use crate::artifacts::objects::object::ObjectBox;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::Error;

/// At most one of the flags may be set; none prints type and size
#[derive(Debug, Clone, Copy, Default)]
pub struct CatFileOptions {
    pub pretty: bool,
    pub type_only: bool,
    pub size_only: bool,
}

impl Repository {
    pub fn cat_file(&self, object_id: &str, options: &CatFileOptions) -> anyhow::Result<()> {
        let selected = [options.pretty, options.type_only, options.size_only]
            .into_iter()
            .filter(|flag| *flag)
            .count();
        if selected > 1 {
            return Err(Error::Validation("only one of -p, -t or -s may be given".into()).into());
        }

        let object_id = ObjectId::try_parse(object_id)?;
        let object_data = self.database().load(&object_id)?;
        let (object_type, size, _) = ObjectType::split_header(&object_data)?;

        if options.type_only {
            writeln!(self.writer(), "{object_type}")?;
        } else if options.size_only {
            writeln!(self.writer(), "{size}")?;
        } else if options.pretty {
            match ObjectBox::parse(&object_data)? {
                // blobs are written back byte for byte
                ObjectBox::Blob(blob) => self.writer().write_all(blob.content())?,
                object => writeln!(self.writer(), "{}", object.as_object().display())?,
            }
        } else {
            writeln!(self.writer(), "{object_type} {size}")?;
        }

        Ok(())
    }
}
