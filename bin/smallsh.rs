fn main() {
    smallsh_rs::shell_main()
}
