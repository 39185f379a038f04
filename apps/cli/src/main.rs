fn main() -> anyhow::Result<()> {
    exam_maker::run()
}
