#[cfg(test)]
mod tests {
    use std::io::{Read, Write};

    use transform_core::crypto::KeyMaterial;
    use transform_core::stream::io::read_up_to;
    use transform_core::stream::{open_input, open_output, InputSource, OutputSink, Pipeline, SharedBuffer};

    #[test]
    fn shared_buffer_clones_see_the_same_bytes() {
        let buf = SharedBuffer::new();
        let mut writer = open_output(OutputSink::Memory(buf.clone())).unwrap();
        writer.write_all(b"abc").unwrap();
        writer.write_all(b"def").unwrap();
        assert_eq!(buf.contents().unwrap(), b"abcdef");
        assert_eq!(buf.take().unwrap(), b"abcdef");
        assert!(buf.contents().unwrap().is_empty());
    }

    #[test]
    fn memory_input_reads_back() {
        let mut reader = open_input(InputSource::Memory(b"hello".to_vec())).unwrap();
        let mut s = String::new();
        reader.read_to_string(&mut s).unwrap();
        assert_eq!(s, "hello");
    }

    #[test]
    fn read_up_to_returns_short_reads_and_eof() {
        let mut reader = open_input(InputSource::Memory(vec![9; 10])).unwrap();
        assert_eq!(read_up_to(&mut reader, 4).unwrap(), vec![9; 4]);
        assert_eq!(read_up_to(&mut reader, 100).unwrap(), vec![9; 6]);
        assert!(read_up_to(&mut reader, 100).unwrap().is_empty());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = open_input(InputSource::File(dir.path().join("absent.bin"))).err().unwrap();
        assert_eq!(err.kind(), transform_core::ErrorKind::Io);
    }

    #[test]
    fn file_sink_and_source_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("attachment.bin");
        let pipeline = Pipeline::attachment(KeyMaterial::generate());

        let sink = open_output(OutputSink::File(path.clone())).unwrap();
        let mut out = pipeline.output_stream(sink).unwrap();
        out.write(b"first").unwrap();
        out.write(b"second").unwrap();
        out.close().unwrap();
        drop(out);

        let source = open_input(InputSource::File(path)).unwrap();
        let mut input = pipeline.input_stream(source).unwrap();
        assert_eq!(input.read_chunk().unwrap(), Some(b"first".to_vec()));
        assert_eq!(input.read_chunk().unwrap(), Some(b"second".to_vec()));
        assert_eq!(input.read_chunk().unwrap(), None);
    }

    #[test]
    fn boxed_reader_source() {
        let pipeline = Pipeline::attachment(KeyMaterial::generate());
        let buf = SharedBuffer::new();
        let mut out = pipeline.output_stream(buf.clone()).unwrap();
        out.write(b"via reader").unwrap();
        out.close().unwrap();

        let source = open_input(InputSource::Reader(Box::new(std::io::Cursor::new(buf.take().unwrap()))))
            .unwrap();
        let mut input = pipeline.input_stream(source).unwrap();
        assert_eq!(input.read(64).unwrap(), b"via reader");
    }
}
